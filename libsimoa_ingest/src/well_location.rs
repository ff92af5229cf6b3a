use std::fmt;
use std::str::FromStr;

use super::error::LocationError;

/// The row letters of a standard 96-well plate, in plate order.
pub const PLATE_ROWS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
/// The number of columns on a standard 96-well plate.
pub const PLATE_COLUMNS: u8 = 12;

const LOCATION_TOKENS: usize = 5;

/// WellLocation is the decoded form of the instrument's free-text well address.
///
/// The instrument reports each sample location as `Plate <N> - Well <L><NN>`,
/// where N is the plate number, L the row letter (A-H) and NN the 1-2 digit
/// column number (1-12).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WellLocation {
    pub plate: u32,
    pub row: char,
    pub column: u8,
}

impl FromStr for WellLocation {
    type Err = LocationError;

    /// Parse an instrument location string.
    ///
    /// The format is a strict contract: exactly five single-space separated
    /// tokens with the literal `Plate`, `-` and `Well` keywords. A deviation
    /// indicates a corrupt export and is an error, not a recovery case.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = raw.split(' ').collect();
        if tokens.len() != LOCATION_TOKENS
            || tokens[0] != "Plate"
            || tokens[2] != "-"
            || tokens[3] != "Well"
        {
            return Err(LocationError::BadPattern(raw.to_string()));
        }

        let plate_token = tokens[1];
        if plate_token.is_empty() || !plate_token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LocationError::BadPlateNumber(plate_token.to_string()));
        }
        let plate: u32 = plate_token
            .parse()
            .map_err(|_| LocationError::BadPlateNumber(plate_token.to_string()))?;
        if plate == 0 {
            return Err(LocationError::PlateOutOfRange(plate));
        }

        let well = tokens[4];
        let row = match well.chars().next() {
            Some(letter) => letter,
            None => return Err(LocationError::BadPattern(raw.to_string())),
        };
        if !PLATE_ROWS.contains(&row) {
            return Err(LocationError::BadRowLetter(row));
        }

        // The row letter is ASCII, so the column digits start at byte 1
        let column_token = &well[1..];
        if !(1..=2).contains(&column_token.len())
            || !column_token.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(LocationError::BadColumnNumber(well.to_string()));
        }
        let column: u8 = column_token
            .parse()
            .map_err(|_| LocationError::BadColumnNumber(well.to_string()))?;
        if column == 0 || column > PLATE_COLUMNS {
            return Err(LocationError::ColumnOutOfRange(column));
        }

        Ok(WellLocation { plate, row, column })
    }
}

impl fmt::Display for WellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plate {} - Well {}{}", self.plate, self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locations() {
        let locations = ["Plate 1 - Well F4", "Plate 2 - Well C10", "Plate 3 - Well H7"];
        let expected = [(1, 'F', 4), (2, 'C', 10), (3, 'H', 7)];
        for (raw, (plate, row, column)) in locations.iter().zip(expected) {
            let well = match WellLocation::from_str(raw) {
                Ok(w) => w,
                Err(e) => panic!("{raw} failed to parse: {e}"),
            };
            assert_eq!(well.plate, plate, "Plate was not parsed correctly");
            assert_eq!(well.row, row, "Row was not parsed correctly");
            assert_eq!(well.column, column, "Column was not parsed correctly");
        }
    }

    #[test]
    fn test_single_and_double_digit_columns() {
        let single = WellLocation::from_str("Plate 1 - Well A1").unwrap();
        assert_eq!(single, WellLocation { plate: 1, row: 'A', column: 1 });
        let double = WellLocation::from_str("Plate 1 - Well A12").unwrap();
        assert_eq!(double, WellLocation { plate: 1, row: 'A', column: 12 });
    }

    #[test]
    fn test_display_round_trip() {
        let raw = "Plate 4 - Well B11";
        let well = WellLocation::from_str(raw).unwrap();
        assert_eq!(well.to_string(), raw);
    }

    #[test]
    fn test_malformed_locations() {
        let cases = [
            ("Plate 1 Well A1", LocationError::BadPattern("Plate 1 Well A1".to_string())),
            ("Dish 1 - Well A1", LocationError::BadPattern("Dish 1 - Well A1".to_string())),
            (
                "Plate 1 -  Well A1",
                LocationError::BadPattern("Plate 1 -  Well A1".to_string()),
            ),
            ("Plate one - Well A1", LocationError::BadPlateNumber("one".to_string())),
            ("Plate -1 - Well A1", LocationError::BadPlateNumber("-1".to_string())),
            ("Plate 0 - Well A1", LocationError::PlateOutOfRange(0)),
            ("Plate 1 - Well I1", LocationError::BadRowLetter('I')),
            ("Plate 1 - Well a1", LocationError::BadRowLetter('a')),
            ("Plate 1 - Well A", LocationError::BadColumnNumber("A".to_string())),
            ("Plate 1 - Well Axx", LocationError::BadColumnNumber("Axx".to_string())),
            ("Plate 1 - Well A012", LocationError::BadColumnNumber("A012".to_string())),
            ("Plate 1 - Well A0", LocationError::ColumnOutOfRange(0)),
            ("Plate 1 - Well A13", LocationError::ColumnOutOfRange(13)),
        ];
        for (raw, expected) in cases {
            match WellLocation::from_str(raw) {
                Ok(well) => panic!("{raw} unexpectedly parsed to {well:?}"),
                Err(error) => assert_eq!(error, expected, "Wrong error for {raw}"),
            }
        }
    }
}
