use std::io::Write;

use rust_decimal::{prelude::ToPrimitive, Decimal};
use tracing::debug;

use crate::{
    errors::SpendbookError,
    render::{
        chart::{ChartView, PieChart, Rgb},
        format_amount,
    },
};

use super::{ANSI_BOLD, ANSI_DIM, ANSI_STOP};

const BAR_WIDTH: usize = 40;

/// Terminal stand-in for a pie chart: one bar split proportionally per
/// category, followed by the legend.
#[derive(Debug)]
pub struct ConsoleChart<W> {
    out: W,
    drawn: u64,
}

/// A chart already printed to the terminal.
#[derive(Debug, PartialEq, Eq)]
pub struct DrawnChart {
    serial: u64,
}

impl<W: Write> ConsoleChart<W> {
    pub fn new(out: W) -> Self {
        Self { out, drawn: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn fg(color: Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m", color.0, color.1, color.2)
}

/// Splits `width` cells among segments so their widths always add up to `width`.
fn segment_widths(shares: &[Decimal], width: usize) -> Vec<usize> {
    let width_dec = Decimal::from(width);
    let mut cumulative = Decimal::ZERO;
    let mut drawn = 0;
    shares
        .iter()
        .map(|share| {
            cumulative += *share;
            let end = (cumulative * width_dec)
                .round()
                .to_usize()
                .unwrap_or(width)
                .min(width);
            let cells = end.saturating_sub(drawn);
            drawn = drawn.max(end);
            cells
        })
        .collect()
}

impl<W: Write> ChartView for ConsoleChart<W> {
    type Handle = DrawnChart;

    fn draw_pie(&mut self, chart: &PieChart) -> Result<DrawnChart, SpendbookError> {
        self.drawn += 1;
        writeln!(self.out, "{ANSI_BOLD}{}{ANSI_STOP}", chart.title)?;
        if chart.is_empty() {
            writeln!(self.out, "{ANSI_DIM}(empty){ANSI_STOP}")?;
            return Ok(DrawnChart { serial: self.drawn });
        }

        let shares = chart.shares();
        let bar: String = segment_widths(&shares, BAR_WIDTH)
            .into_iter()
            .zip(&chart.colors)
            .map(|(cells, &color)| format!("{}{}", fg(color), "█".repeat(cells)))
            .collect();
        writeln!(self.out, "{bar}{ANSI_STOP}")?;

        for ((label, value), (share, &color)) in chart
            .labels
            .iter()
            .zip(&chart.values)
            .zip(shares.iter().zip(&chart.colors))
        {
            let percent = (*share * Decimal::ONE_HUNDRED).round_dp(1);
            writeln!(
                self.out,
                "{}■{ANSI_STOP} {label} {} ({percent:.1}%)",
                fg(color),
                format_amount(*value)
            )?;
        }
        Ok(DrawnChart { serial: self.drawn })
    }

    fn destroy(&mut self, handle: DrawnChart) -> Result<(), SpendbookError> {
        debug!(serial = handle.serial, "discarding chart");
        Ok(())
    }
}
