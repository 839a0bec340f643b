use std::fmt::Display;

use rust_decimal::Decimal;
use tracing::debug;

use crate::{errors::SpendbookError, expenses::Expense};

pub const CHART_TITLE: &str = "Spending by Category";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Segment colours, reused from the start once there are more categories.
pub const PALETTE: [Rgb; 5] = [
    Rgb(0x00, 0x79, 0x6b),
    Rgb(0x4c, 0xaf, 0x50),
    Rgb(0xfb, 0xc0, 0x2d),
    Rgb(0xe6, 0x4a, 0x19),
    Rgb(0x95, 0x75, 0xcd),
];

/// Everything needed to draw the category pie; labels, values and colors are index-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieChart {
    pub title: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
    pub colors: Vec<Rgb>,
}

impl PieChart {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let (labels, values): (Vec<_>, Vec<_>) = category_totals(expenses).into_iter().unzip();
        let colors = PALETTE.iter().copied().cycle().take(labels.len()).collect();
        Self {
            title: CHART_TITLE,
            labels,
            values,
            colors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.values
            .iter()
            .fold(Decimal::ZERO, |sum, value| sum.saturating_add(*value))
    }

    /// Fraction of the whole taken by each segment; empty for an empty chart.
    pub fn shares(&self) -> Vec<Decimal> {
        let total = self.total();
        if total.is_zero() {
            return vec![Decimal::ZERO; self.values.len()];
        }
        self.values.iter().map(|value| value / total).collect()
    }
}

/// Sums amounts per category, keeping categories in first-seen order.
pub fn category_totals(expenses: &[Expense]) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for expense in expenses {
        match totals
            .iter_mut()
            .find(|(category, _)| *category == expense.category)
        {
            Some((_, sum)) => *sum = sum.saturating_add(expense.amount),
            None => totals.push((expense.category.clone(), expense.amount)),
        }
    }
    totals
}

/// A charting surface. Each drawn chart is identified by a handle that must
/// be given back to [`ChartView::destroy`] before it is replaced.
pub trait ChartView {
    type Handle;

    fn draw_pie(&mut self, chart: &PieChart) -> Result<Self::Handle, SpendbookError>;
    fn destroy(&mut self, handle: Self::Handle) -> Result<(), SpendbookError>;
}

/// Owns the single live chart and swaps it on every redraw.
pub struct ChartRenderer<V: ChartView> {
    view: V,
    current: Option<V::Handle>,
}

impl<V: ChartView> ChartRenderer<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            current: None,
        }
    }

    pub fn redraw(&mut self, expenses: &[Expense]) -> Result<(), SpendbookError> {
        if let Some(previous) = self.current.take() {
            self.view.destroy(previous)?;
        }
        let chart = PieChart::from_expenses(expenses);
        debug!(segments = chart.labels.len(), "drawing chart");
        self.current = Some(self.view.draw_pie(&chart)?);
        Ok(())
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{collections::HashSet, str::FromStr};

    use super::*;
    use crate::expenses::ExpenseId;

    /// Tracks which drawn charts are still alive.
    #[derive(Debug, Default)]
    pub struct RecordingChart {
        pub drawn: Vec<PieChart>,
        pub live: HashSet<usize>,
        pub destroyed: Vec<usize>,
    }

    impl RecordingChart {
        pub fn last(&self) -> Option<&PieChart> {
            self.drawn.last()
        }
    }

    impl ChartView for RecordingChart {
        type Handle = usize;

        fn draw_pie(&mut self, chart: &PieChart) -> Result<usize, SpendbookError> {
            self.drawn.push(chart.clone());
            let handle = self.drawn.len() - 1;
            self.live.insert(handle);
            Ok(handle)
        }

        fn destroy(&mut self, handle: usize) -> Result<(), SpendbookError> {
            assert!(self.live.remove(&handle), "chart {handle} destroyed twice");
            self.destroyed.push(handle);
            Ok(())
        }
    }

    fn expense(category: &str, amount: &str) -> Expense {
        Expense {
            id: ExpenseId::from(format!("{category}{amount}")),
            description: "x".into(),
            amount: Decimal::from_str(amount).unwrap(),
            category: category.into(),
            date: "10/18/2026".into(),
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let totals = category_totals(&[
            expense("Food", "10"),
            expense("Rent", "500"),
            expense("Food", "5"),
            expense("Fun", "2.5"),
        ]);
        assert_eq!(
            totals,
            vec![
                ("Food".to_string(), Decimal::from(15)),
                ("Rent".to_string(), Decimal::from(500)),
                ("Fun".to_string(), Decimal::from_str("2.5").unwrap()),
            ]
        );
    }

    #[test]
    fn segment_sum_matches_total_and_count_matches_categories() {
        let expenses = [
            expense("A", "1.10"),
            expense("B", "2.20"),
            expense("A", "3.30"),
            expense("C", "0.05"),
        ];
        let chart = PieChart::from_expenses(&expenses);
        let grand: Decimal = expenses.iter().map(|e| e.amount).sum();
        assert_eq!(chart.total(), grand);
        assert_eq!(chart.labels.len(), 3);
        assert_eq!(chart.values.len(), 3);
        assert_eq!(chart.colors.len(), 3);
        assert_eq!(chart.shares().iter().sum::<Decimal>().round_dp(10), Decimal::ONE);
    }

    #[test]
    fn palette_cycles_past_five_categories() {
        let expenses: Vec<_> = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|c| expense(c, "1"))
            .collect();
        let chart = PieChart::from_expenses(&expenses);
        assert_eq!(chart.colors[5], PALETTE[0]);
        assert_eq!(chart.colors[6], PALETTE[1]);
        assert_eq!(PALETTE[0].to_string(), "#00796b");
    }

    #[test]
    fn huge_stored_amounts_saturate() {
        let max = Decimal::MAX.to_string();
        let chart = PieChart::from_expenses(&[
            expense("Food", &max),
            expense("Food", "1"),
            expense("Fun", "1"),
        ]);
        assert_eq!(chart.values, vec![Decimal::MAX, Decimal::ONE]);
        assert_eq!(chart.total(), Decimal::MAX);
        assert_eq!(chart.shares().len(), 2);
    }

    #[test]
    fn empty_input_is_an_empty_chart() {
        let chart = PieChart::from_expenses(&[]);
        assert!(chart.is_empty());
        assert!(chart.shares().is_empty());
        assert_eq!(chart.total(), Decimal::ZERO);
    }

    #[test]
    fn redraw_destroys_previous_chart_first() {
        let mut renderer = ChartRenderer::new(RecordingChart::default());
        renderer.redraw(&[expense("Food", "1")]).unwrap();
        renderer.redraw(&[expense("Food", "1"), expense("Fun", "2")]).unwrap();
        renderer.redraw(&[]).unwrap();

        let view = renderer.view();
        assert_eq!(view.drawn.len(), 3);
        assert_eq!(view.destroyed, vec![0, 1]);
        assert_eq!(view.live, HashSet::from([2]));
        assert!(view.last().unwrap().is_empty());
    }
}
