use crate::{category::TransactionCategory, expense::Expense, transaction::Transaction};
use log::trace;
use rust_decimal::Decimal;
use serde::Serialize;

/// Summary figures for the rider's dashboard.
///
/// These are never stored. They are recomputed from the stores on every read.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LedgerTotals {
    pub earnings: Decimal,
    pub collections: Decimal,
    pub expense_total: Decimal,
    pub net_profit: Decimal,
}

/// Calculate the ledger totals for a set of transactions and expenses.
///
/// Profit is delivery charges less expenses. Collections and payments are cash the
/// rider handles for the platform, so they are reported but never count as income.
///
/// Sums saturate at the bounds of `Decimal` rather than overflow. Record amounts are
/// capped well below that, so a saturated total means the inputs bypassed validation.
pub fn compute_totals<'a, T, E>(transactions: T, expenses: E) -> LedgerTotals
where
    T: IntoIterator<Item = &'a Transaction>,
    E: IntoIterator<Item = &'a Expense>,
{
    let mut earnings = Decimal::ZERO;
    let mut collections = Decimal::ZERO;

    for t in transactions {
        match t.category() {
            TransactionCategory::DeliveryCharge => {
                earnings = earnings.saturating_add(t.amount())
            }
            TransactionCategory::Collection => {
                collections = collections.saturating_add(t.amount())
            }
            TransactionCategory::Payment | TransactionCategory::Other => (),
        }
    }

    let expense_total = expenses
        .into_iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount()));

    let totals = LedgerTotals {
        earnings,
        collections,
        expense_total,
        net_profit: earnings.saturating_sub(expense_total),
    };

    trace!("computed totals: {:?}", totals);

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(category: TransactionCategory, amount: Decimal) -> Transaction {
        Transaction::new("01/05/2024", category, "TX", amount)
    }

    fn scenario() -> (Vec<Transaction>, Vec<Expense>) {
        (
            vec![
                tx(TransactionCategory::DeliveryCharge, dec!(120)),
                tx(TransactionCategory::Collection, dec!(500)),
                tx(TransactionCategory::Payment, dec!(50)),
            ],
            vec![Expense::new("Fuel", dec!(40)).unwrap()],
        )
    }

    #[test]
    fn compute_totals_empty() {
        let transactions: Vec<Transaction> = Vec::new();
        let expenses: Vec<Expense> = Vec::new();
        let totals = compute_totals(&transactions, &expenses);
        assert_eq!(totals, LedgerTotals::default());
        assert_eq!(totals.net_profit, Decimal::ZERO);
    }

    #[test]
    fn compute_totals_scenario() {
        let (transactions, expenses) = scenario();
        let totals = compute_totals(&transactions, &expenses);

        assert_eq!(
            totals,
            LedgerTotals {
                earnings: dec!(120),
                collections: dec!(500),
                expense_total: dec!(40),
                net_profit: dec!(80),
            }
        );
    }

    #[test]
    fn compute_totals_ignores_payments_and_other() {
        let transactions = vec![
            tx(TransactionCategory::Payment, dec!(1000)),
            tx(TransactionCategory::Other, dec!(250)),
        ];
        let totals = compute_totals(&transactions, &Vec::<Expense>::new());

        assert_eq!(totals, LedgerTotals::default());
    }

    #[test]
    fn compute_totals_negative_profit() {
        let transactions = vec![tx(TransactionCategory::DeliveryCharge, dec!(30))];
        let expenses = vec![Expense::new("Tyre repair", dec!(150)).unwrap()];
        let totals = compute_totals(&transactions, &expenses);

        assert_eq!(totals.net_profit, dec!(-120));
    }

    #[test]
    fn compute_totals_exact_decimals() {
        let transactions = vec![
            tx(TransactionCategory::DeliveryCharge, dec!(0.1)),
            tx(TransactionCategory::DeliveryCharge, dec!(0.2)),
        ];
        let totals = compute_totals(&transactions, &Vec::<Expense>::new());

        assert_eq!(totals.earnings, dec!(0.3));
    }

    #[test]
    fn compute_totals_saturates_instead_of_overflowing() {
        let transactions = vec![
            tx(TransactionCategory::DeliveryCharge, Decimal::MAX),
            tx(TransactionCategory::DeliveryCharge, Decimal::MAX),
            tx(TransactionCategory::Collection, Decimal::MAX),
            tx(TransactionCategory::Collection, dec!(1)),
        ];
        let totals = compute_totals(&transactions, &Vec::<Expense>::new());

        assert_eq!(totals.earnings, Decimal::MAX);
        assert_eq!(totals.collections, Decimal::MAX);
        assert_eq!(totals.net_profit, Decimal::MAX);

        let transactions = vec![tx(TransactionCategory::DeliveryCharge, Decimal::MIN)];
        let expenses = vec![Expense::new("Fuel", dec!(40)).unwrap()];
        let totals = compute_totals(&transactions, &expenses);

        assert_eq!(totals.net_profit, Decimal::MIN);
    }

    #[test]
    fn compute_totals_order_independent() {
        let (mut transactions, _) = scenario();
        let mut expenses = vec![
            Expense::new("Fuel", dec!(40.25)).unwrap(),
            Expense::new("Lunch", dec!(95)).unwrap(),
            Expense::new("Mobile Recharge", dec!(20.5)).unwrap(),
        ];
        let expected = compute_totals(&transactions, &expenses);

        transactions.reverse();
        expenses.rotate_left(1);
        assert_eq!(compute_totals(&transactions, &expenses), expected);

        transactions.swap(0, 1);
        expenses.reverse();
        assert_eq!(compute_totals(&transactions, &expenses), expected);
    }
}
