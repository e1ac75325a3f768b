//! Progressive bracket table application.

use rust_decimal::Decimal;

use crate::providers::TaxBracket;

/// Computes tax on `income` from a bracket table sorted by `over` ascending.
///
/// The bracket containing the income supplies the marginal rate and the
/// cumulative base tax: `base_tax + rate × (income − over)`. Income at or
/// below the first bracket's lower bound owes nothing.
pub fn tax_from_brackets(income: Decimal, brackets: &[TaxBracket]) -> Decimal {
    let Some(bracket) = brackets.iter().rfind(|b| income > b.over) else {
        return Decimal::ZERO;
    };
    bracket.base_tax + bracket.rate * (income - bracket.over)
}
