use crate::{Point2, RecordError};

/// Parses a bulk constraint record.
///
/// A record is a `;` separated list of numbers `x0;y0;x1;y1;x2;y2;x3;y3;...`. Every four
/// consecutive numbers describe one segment from `(x0, y0)` to `(x1, y1)`. Whitespace around
/// numbers and a single trailing separator are ignored.
///
/// # Example
/// ```
/// use cdt_mesh::{parse_constraint_record, Point2};
///
/// # fn main() -> Result<(), cdt_mesh::RecordError> {
/// let segments = parse_constraint_record("10;10;90;10; 90;10;90;90;")?;
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[1], [Point2::new(90.0, 10.0), Point2::new(90.0, 90.0)]);
/// # Ok(())
/// # }
/// ```
pub fn parse_constraint_record(record: &str) -> Result<Vec<[Point2; 2]>, RecordError> {
    let mut tokens: Vec<_> = record.split(';').map(str::trim).collect();
    if tokens.last().map_or(false, |token| token.is_empty()) {
        tokens.pop();
    }

    let numbers = tokens
        .iter()
        .enumerate()
        .map(|(index, token)| match token.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(number),
            _ => Err(RecordError::InvalidNumber { index }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if numbers.len() % 4 != 0 {
        return Err(RecordError::InvalidLength { len: numbers.len() });
    }

    Ok(numbers
        .chunks_exact(4)
        .map(|chunk| [Point2::new(chunk[0], chunk[1]), Point2::new(chunk[2], chunk[3])])
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_record() -> Result<(), RecordError> {
        let segments = parse_constraint_record("1;2;3;4;5.5;-6;7e1;8")?;
        assert_eq!(
            segments,
            vec![
                [Point2::new(1.0, 2.0), Point2::new(3.0, 4.0)],
                [Point2::new(5.5, -6.0), Point2::new(70.0, 8.0)],
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parse_empty_record() -> Result<(), RecordError> {
        assert!(parse_constraint_record("")?.is_empty());
        assert!(parse_constraint_record(" ; ").is_err());
        Ok(())
    }

    #[test]
    fn test_whitespace_and_trailing_separator() -> Result<(), RecordError> {
        let segments = parse_constraint_record(" 1 ; 2;3 ;4 ;\n")?;
        assert_eq!(segments, vec![[Point2::new(1.0, 2.0), Point2::new(3.0, 4.0)]]);
        Ok(())
    }

    #[test]
    fn test_invalid_records() {
        assert_eq!(
            parse_constraint_record("1;2;3"),
            Err(RecordError::InvalidLength { len: 3 })
        );
        assert_eq!(
            parse_constraint_record("1;2;3;4;5;6"),
            Err(RecordError::InvalidLength { len: 6 })
        );
        assert_eq!(
            parse_constraint_record("1;2;three;4"),
            Err(RecordError::InvalidNumber { index: 2 })
        );
        assert_eq!(
            parse_constraint_record("1;;3;4"),
            Err(RecordError::InvalidNumber { index: 1 })
        );
        assert_eq!(
            parse_constraint_record("1;2;inf;4"),
            Err(RecordError::InvalidNumber { index: 2 })
        );
    }
}
