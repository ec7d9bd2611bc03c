//! Helpers for handling amounts of money.
//!
//! Amounts are [Decimal]s in memory and TEXT in the database so that values
//! such as `480.50` survive a round trip through the store unchanged.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rusqlite::{Row, types::Type, types::ValueRef};

/// The number of decimal places money is stored with.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Round `amount` to two decimal places, rounding halves away from zero.
///
/// For example, `123.455` becomes `123.46` and `-0.005` becomes `-0.01`.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        CURRENCY_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Convert an amount into the text stored in the database.
pub fn to_sql_text(amount: Decimal) -> String {
    amount.to_string()
}

/// Read an amount from the column `index` of `row`.
///
/// Integer and real values are accepted as well as text, so that columns
/// produced by SQL expressions such as `COALESCE(actual, 0)` can be read.
///
/// # Errors
/// Returns an error if the column is NULL, a blob, or text that is not a number.
pub fn read_amount(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    match row.get_ref(index)? {
        ValueRef::Integer(value) => Ok(Decimal::from(value)),
        ValueRef::Real(value) => Decimal::try_from(value).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(index, Type::Real, Box::new(error))
        }),
        value @ ValueRef::Text(_) => {
            let text = value.as_str().map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
            })?;
            Decimal::from_str(text.trim()).map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
            })
        }
        ValueRef::Null => Err(rusqlite::Error::InvalidColumnType(
            index,
            "amount".to_owned(),
            Type::Null,
        )),
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            index,
            "amount".to_owned(),
            Type::Blob,
        )),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use rusqlite::Connection;

    use super::{read_amount, round_currency};

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_currency(dec!(123.456)), dec!(123.46));
        assert_eq!(round_currency(dec!(480.5)), dec!(480.50));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_currency(dec!(0.125)), dec!(0.13));
        assert_eq!(round_currency(dec!(2.675)), dec!(2.68));
        assert_eq!(round_currency(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn reads_text_integer_and_real_columns() {
        let connection = Connection::open_in_memory().unwrap();

        let (text, integer, real) = connection
            .query_row("SELECT '480.50', 0, 1.5", [], |row| {
                Ok((
                    read_amount(row, 0)?,
                    read_amount(row, 1)?,
                    read_amount(row, 2)?,
                ))
            })
            .unwrap();

        assert_eq!(text, dec!(480.50));
        assert_eq!(integer, dec!(0));
        assert_eq!(real, dec!(1.5));
    }

    #[test]
    fn read_fails_on_garbage_text() {
        let connection = Connection::open_in_memory().unwrap();

        let result = connection.query_row("SELECT 'lots'", [], |row| read_amount(row, 0));

        assert!(result.is_err());
    }
}
