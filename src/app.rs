use chrono::{DateTime, Local};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::{
    errors::{SpendbookError, ValidationError},
    expenses::{store::RecordStore, validate, Expense, ExpenseId, RawExpenseInput},
    render::{
        chart::{ChartRenderer, ChartView},
        table::{render_table, TableView},
    },
    storage::KeyValueStore,
};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this expense?";

/// The add-expense form.
pub trait ExpenseForm {
    fn read(&mut self) -> Result<RawExpenseInput, SpendbookError>;
    fn reset(&mut self);
}

/// Blocking yes/no question to the user.
pub trait Confirmation {
    fn confirm(&mut self, prompt: &str) -> Result<bool, SpendbookError>;
}

impl<F: FnMut(&str) -> bool> Confirmation for F {
    fn confirm(&mut self, prompt: &str) -> Result<bool, SpendbookError> {
        Ok(self(prompt))
    }
}

/// Blocking message to the user.
pub trait Alert {
    fn alert(&mut self, message: &str);
}

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(ExpenseId),
    Rejected(ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub date_format: String,
    pub decimal_sep: char,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            date_format: "%-m/%-d/%Y".to_string(),
            decimal_sep: '.',
        }
    }
}

/// Owns the record store and both views; every successful mutation
/// re-renders the table and the chart from the full list.
pub struct ExpenseTracker<S, T, C: ChartView> {
    store: RecordStore<S>,
    table: T,
    chart: ChartRenderer<C>,
    settings: TrackerSettings,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl<S, T, C> ExpenseTracker<S, T, C>
where
    S: KeyValueStore,
    T: TableView,
    C: ChartView,
{
    pub fn new(storage: S, table: T, chart: C, settings: TrackerSettings) -> Self {
        Self {
            store: RecordStore::load(storage),
            table,
            chart: ChartRenderer::new(chart),
            settings,
            clock: Box::new(SystemClock),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Draws both views for the loaded list.
    pub fn start(&mut self) -> Result<(), SpendbookError> {
        self.render()
    }

    pub fn add_expense(
        &mut self,
        form: &mut impl ExpenseForm,
        alert: &mut impl Alert,
    ) -> Result<AddOutcome, SpendbookError> {
        let input = form.read()?;
        let valid = match validate(&input, self.settings.decimal_sep) {
            Ok(valid) => valid,
            Err(err) => {
                debug!(?err, "rejected expense input");
                alert.alert(&err.to_string());
                return Ok(AddOutcome::Rejected(err));
            }
        };

        let now = self.clock.now();
        let id = self.store.fresh_id(now.timestamp_millis(), &mut self.rng);
        let date = now.format(&self.settings.date_format).to_string();
        self.store.add(valid.into_expense(id.clone(), date))?;
        info!(%id, "expense added");

        form.reset();
        self.render()?;
        Ok(AddOutcome::Added(id))
    }

    pub fn delete_expense(
        &mut self,
        id: &ExpenseId,
        confirmation: &mut impl Confirmation,
    ) -> Result<DeleteOutcome, SpendbookError> {
        if !confirmation.confirm(DELETE_PROMPT)? {
            debug!(%id, "deletion declined");
            return Ok(DeleteOutcome::Declined);
        }
        if self.store.remove(id)?.is_some() {
            info!(%id, "expense deleted");
        }
        self.render()?;
        Ok(DeleteOutcome::Deleted)
    }

    fn render(&mut self) -> Result<(), SpendbookError> {
        render_table(self.store.all(), &mut self.table)?;
        self.chart.redraw(self.store.all())
    }

    pub fn expenses(&self) -> &[Expense] {
        self.store.all()
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn chart(&self) -> &C {
        self.chart.view()
    }
}
