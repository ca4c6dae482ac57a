//! Line consolidation
//!
//! Lines are keyed by `(product, purchase option)`. Two lines with the same key
//! never coexist: they merge by summing their quantities, saturating at
//! `u32::MAX`.

use thiserror::Error;

use crate::domain::{
    carts::data::NewCartLine,
    products::{PurchaseOption, records::ProductUuid},
};

/// A requested quantity was below one or above `u32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quantity {0} is out of range")]
pub struct QuantityOutOfRange(pub i64);

/// A validated line with a merged quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsolidatedLine {
    pub product_uuid: ProductUuid,
    pub purchase_option: PurchaseOption,
    pub quantity: u32,
}

/// Validate a requested quantity.
///
/// # Errors
///
/// Returns [`QuantityOutOfRange`] for anything outside `1..=u32::MAX`.
pub fn positive_quantity(quantity: i64) -> Result<u32, QuantityOutOfRange> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or(QuantityOutOfRange(quantity))
}

/// Merge lines sharing a key, keeping first-seen order.
///
/// # Errors
///
/// Returns [`QuantityOutOfRange`] if any line has an invalid quantity.
pub fn consolidate<I>(lines: I) -> Result<Vec<ConsolidatedLine>, QuantityOutOfRange>
where
    I: IntoIterator<Item = NewCartLine>,
{
    let mut merged: Vec<ConsolidatedLine> = Vec::new();

    for line in lines {
        let quantity = positive_quantity(line.quantity)?;

        let existing = merged.iter_mut().find(|m| {
            m.product_uuid == line.product_uuid && m.purchase_option == line.purchase_option
        });

        match existing {
            Some(m) => m.quantity = m.quantity.saturating_add(quantity),
            None => merged.push(ConsolidatedLine {
                product_uuid: line.product_uuid,
                purchase_option: line.purchase_option,
                quantity,
            }),
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn line(
        product_uuid: ProductUuid,
        quantity: i64,
        purchase_option: PurchaseOption,
    ) -> NewCartLine {
        NewCartLine {
            product_uuid,
            quantity,
            purchase_option,
        }
    }

    #[test]
    fn same_key_merges_by_summing() -> TestResult {
        let a = ProductUuid::new();

        let lines = consolidate([
            line(a, 2, PurchaseOption::Standard),
            line(a, 3, PurchaseOption::Standard),
        ])?;

        assert_eq!(
            lines,
            vec![ConsolidatedLine {
                product_uuid: a,
                purchase_option: PurchaseOption::Standard,
                quantity: 5,
            }]
        );

        Ok(())
    }

    #[test]
    fn different_options_stay_separate_in_first_seen_order() -> TestResult {
        let a = ProductUuid::new();
        let b = ProductUuid::new();

        let lines = consolidate([
            line(b, 1, PurchaseOption::Express),
            line(a, 1, PurchaseOption::Standard),
            line(b, 1, PurchaseOption::Standard),
            line(b, 4, PurchaseOption::Express),
        ])?;

        let keys: Vec<_> = lines
            .iter()
            .map(|l| (l.product_uuid, l.purchase_option, l.quantity))
            .collect();

        assert_eq!(
            keys,
            vec![
                (b, PurchaseOption::Express, 5),
                (a, PurchaseOption::Standard, 1),
                (b, PurchaseOption::Standard, 1),
            ]
        );

        Ok(())
    }

    #[test]
    fn merged_quantity_saturates() -> TestResult {
        let a = ProductUuid::new();

        let lines = consolidate([
            line(a, i64::from(u32::MAX), PurchaseOption::Bulk),
            line(a, 10, PurchaseOption::Bulk),
        ])?;

        assert_eq!(lines.first().map(|l| l.quantity), Some(u32::MAX));

        Ok(())
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        let a = ProductUuid::new();

        assert_eq!(
            consolidate([line(a, 0, PurchaseOption::Standard)]),
            Err(QuantityOutOfRange(0))
        );
        assert_eq!(
            consolidate([
                line(a, 1, PurchaseOption::Standard),
                line(a, -2, PurchaseOption::Standard)
            ]),
            Err(QuantityOutOfRange(-2))
        );
    }

    #[test]
    fn positive_quantity_bounds() {
        assert_eq!(positive_quantity(1), Ok(1));
        assert_eq!(positive_quantity(i64::from(u32::MAX)), Ok(u32::MAX));
        assert!(positive_quantity(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn empty_input_consolidates_to_nothing() -> TestResult {
        assert!(consolidate(std::iter::empty())?.is_empty());

        Ok(())
    }
}
