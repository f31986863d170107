//! The exploratory analysis pipeline.
//!
//! ORDER (the `eda` binary calls them in this order):
//!   1. transactions over time   → two line charts
//!   2. top products             → horizontal bars
//!   3. customer frequency       → horizontal bars
//!   4. payment methods          → pie
//!   5. customer churn           → histogram, scatter, reasons bars
//!
//! Every step returns its intermediate table for the caller to print.
//! An empty result renders no chart.

use crate::{
    charts::{ChartWriter, Marker, Series},
    churn::{self, ChurnAssessment, ChurnSegment, ChurnSummary},
    config::{AnalysisConfig, ChurnParams},
    error::FleetResult,
    store::{AccountFrequency, DailyTotals, DataStore, PaymentMethodCount, ProductTotals},
};
use plotters::style::{RGBColor, BLUE, RED};
use std::path::{Path, PathBuf};

const RETAINED: RGBColor = BLUE;
const CHURNED: RGBColor = RED;
const THRESHOLD: RGBColor = RGBColor(40, 40, 40);
const SECONDARY: RGBColor = RGBColor(0, 140, 70);

/// Everything the churn step produces.
#[derive(Debug, Clone)]
pub struct ChurnReport {
    pub assessments: Vec<ChurnAssessment>,
    pub summary:     ChurnSummary,
    pub segments:    Vec<ChurnSegment>,
}

pub struct Analysis<'a> {
    store:    &'a DataStore,
    config:   &'a AnalysisConfig,
    charts:   ChartWriter,
    rendered: Vec<PathBuf>,
}

impl<'a> Analysis<'a> {
    /// Charts are written under `out_dir`, created if missing.
    pub fn new(store: &'a DataStore, config: &'a AnalysisConfig, out_dir: &Path) -> FleetResult<Self> {
        let charts = ChartWriter::new(out_dir, config.chart_width, config.chart_height)?;
        Ok(Self {
            store,
            config,
            charts,
            rendered: Vec::new(),
        })
    }

    /// Paths of every chart written so far, in render order.
    pub fn rendered(&self) -> &[PathBuf] {
        &self.rendered
    }

    pub fn transactions_over_time(&mut self) -> FleetResult<Vec<DailyTotals>> {
        let daily = self.store.daily_transaction_totals()?;
        let Some(first) = daily.first().map(|d| d.date) else {
            log::warn!("No transactions; skipping time-series charts");
            return Ok(daily);
        };

        let offset = |d: &DailyTotals| (d.date - first).num_days() as i32;
        let counts: Vec<(i32, f64)> = daily.iter().map(|d| (offset(d), d.transactions as f64)).collect();
        let totals: Vec<(i32, f64)> = daily.iter().map(|d| (offset(d), d.total_amount as f64)).collect();

        let path = self.charts.daily_line(
            "transactions_per_day.svg",
            "Transacciones por día",
            "Número de transacciones",
            first,
            &counts,
        )?;
        self.rendered.push(path);
        let path = self.charts.daily_line(
            "amount_per_day.svg",
            "Monto total por día",
            "Monto total",
            first,
            &totals,
        )?;
        self.rendered.push(path);
        Ok(daily)
    }

    pub fn top_products(&mut self) -> FleetResult<Vec<ProductTotals>> {
        let products = self.store.top_products(self.config.top_products)?;
        if products.is_empty() {
            log::warn!("No transaction items; skipping product chart");
            return Ok(products);
        }

        // Largest at the top of the chart.
        let bars: Vec<(String, f64)> = products
            .iter()
            .rev()
            .map(|p| (p.product.clone(), p.quantity as f64))
            .collect();
        let path = self.charts.horizontal_bars(
            "top_products.svg",
            &format!("Top {} productos por cantidad", self.config.top_products),
            "Cantidad vendida",
            "Producto",
            &bars,
        )?;
        self.rendered.push(path);
        Ok(products)
    }

    pub fn customer_frequency(&mut self) -> FleetResult<Vec<AccountFrequency>> {
        let accounts = self.store.top_accounts_by_frequency(self.config.top_accounts)?;
        if accounts.is_empty() {
            log::warn!("No transactions; skipping customer frequency chart");
            return Ok(accounts);
        }

        let bars: Vec<(String, f64)> = accounts
            .iter()
            .rev()
            .map(|a| (a.account_id.to_string(), a.transactions as f64))
            .collect();
        let path = self.charts.horizontal_bars(
            "customer_frequency.svg",
            &format!("Top {} clientes por frecuencia", self.config.top_accounts),
            "Número de transacciones",
            "Cliente",
            &bars,
        )?;
        self.rendered.push(path);
        Ok(accounts)
    }

    pub fn payment_methods(&mut self) -> FleetResult<Vec<PaymentMethodCount>> {
        let methods = self.store.payment_method_counts()?;
        if methods.is_empty() {
            log::warn!("No transactions; skipping payment method chart");
            return Ok(methods);
        }

        let slices: Vec<(String, f64)> = methods
            .iter()
            .map(|m| (m.method.clone(), m.transactions as f64))
            .collect();
        let path = self
            .charts
            .pie("payment_methods.svg", "Distribución de métodos de pago", &slices)?;
        self.rendered.push(path);
        Ok(methods)
    }

    pub fn customer_churn(&mut self, params: &ChurnParams) -> FleetResult<ChurnReport> {
        let activity = self.store.account_activity()?;
        let assessments = churn::classify(&activity, params);
        let summary = churn::summarize(&assessments);
        let segments = churn::segment(&assessments);
        log::info!(
            "Churn: {}/{} accounts ({:.2}%)",
            summary.churned,
            summary.accounts,
            summary.churn_rate * 100.0
        );

        if assessments.is_empty() {
            log::warn!("No account activity; skipping churn charts");
        } else {
            self.render_churn(&assessments, &summary, params)?;
        }

        Ok(ChurnReport {
            assessments,
            summary,
            segments,
        })
    }

    fn render_churn(
        &mut self,
        assessments: &[ChurnAssessment],
        summary: &ChurnSummary,
        params: &ChurnParams,
    ) -> FleetResult<()> {
        let (churned, retained): (Vec<&ChurnAssessment>, Vec<&ChurnAssessment>) =
            assessments.iter().partition(|a| a.churned);

        let days = |group: &[&ChurnAssessment]| -> Vec<f64> {
            group.iter().map(|a| a.days_since_last_purchase as f64).collect()
        };
        let (retained_days, churned_days) = (days(&retained), days(&churned));
        let path = self.charts.grouped_histogram(
            "churn_days_since_purchase.svg",
            "Días desde la última compra",
            "Días",
            "Clientes",
            &[
                Series { name: "Activo", color: RETAINED, values: &retained_days },
                Series { name: "Churn", color: CHURNED, values: &churned_days },
            ],
            self.config.histogram_bins,
            Some(Marker {
                value: params.days_without_purchase as f64,
                label: "Umbral días sin compra",
                color: THRESHOLD,
            }),
        )?;
        self.rendered.push(path);

        let points = |group: &[&ChurnAssessment]| -> Vec<(f64, f64)> {
            group
                .iter()
                .map(|a| (a.activity.avg_amount, a.activity.transactions as f64))
                .collect()
        };
        let (retained_points, churned_points) = (points(&retained), points(&churned));
        let path = self.charts.grouped_scatter(
            "churn_amount_vs_frequency.svg",
            "Monto promedio vs frecuencia",
            "Monto promedio",
            "Número de transacciones",
            &[
                Series { name: "Activo", color: RETAINED, values: &retained_points },
                Series { name: "Churn", color: CHURNED, values: &churned_points },
            ],
            Marker {
                value: params.min_avg_amount,
                label: "Umbral monto mínimo",
                color: THRESHOLD,
            },
            Marker {
                value: params.min_transactions as f64,
                label: "Umbral frecuencia mínima",
                color: SECONDARY,
            },
        )?;
        self.rendered.push(path);

        let reasons = [
            ("Tiempo".to_string(), summary.reasons.time as f64),
            ("Monto".to_string(), summary.reasons.amount as f64),
            ("Frecuencia".to_string(), summary.reasons.frequency as f64),
        ];
        let path = self.charts.vertical_bars(
            "churn_reasons.svg",
            "Razones de churn",
            "Regla",
            "Clientes",
            &reasons,
        )?;
        self.rendered.push(path);
        Ok(())
    }
}
