//! Grounding gate between the receipt collection and an answering collaborator.
//!
//! The collaborator is untrusted: it only ever receives the receipts inside the
//! resolved window, and when that window holds nothing it is not called at all.
//! The absence statement is produced here and names only the requested period.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use raseed_core::{
    category_totals, scope_receipts, CategoryTotal, MonthKey, Receipt, TimeExpressionKind, Window,
};
use serde::{Deserialize, Serialize};

/// Everything an answering collaborator may see for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedContext {
    pub question: String,
    pub kind: TimeExpressionKind,
    pub window: Window,
    pub period: String,
    /// Newest first, capped at the configured prompt limit
    pub receipts: Vec<Receipt>,
    /// In-window receipts left out of `receipts` by the cap
    pub omitted: usize,
    /// Computed over every in-window receipt, including omitted ones
    pub window_total: f64,
    pub window_categories: Vec<CategoryTotal>,
    pub window_receipt_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Grounding {
    /// The requested period has no receipts; `statement` is the whole answer
    NoData {
        kind: TimeExpressionKind,
        window: Window,
        statement: String,
    },
    Context(GroundedContext),
}

/// Produces an answer from grounded data only (a model client, a template...).
pub trait AnsweringCollaborator {
    fn answer(&self, context: &GroundedContext) -> Result<String>;
}

/// Human period label, e.g. "last month (Jun 2025)" or "this week (2025-07-14 to 2025-07-20)".
pub fn period_label(kind: TimeExpressionKind, window: Window) -> String {
    match (kind, window) {
        (TimeExpressionKind::Unbounded, _) | (_, Window::Unbounded) => "all time".to_string(),
        (TimeExpressionKind::ThisMonth | TimeExpressionKind::LastMonth, Window::Bounded { start, .. }) => {
            format!("{} ({})", kind.period_phrase(), MonthKey::of(start))
        }
        (_, Window::Bounded { start, end }) => {
            format!("{} ({} to {})", kind.period_phrase(), start, end)
        }
    }
}

/// The complete response for a period without data.
pub fn absence_statement(kind: TimeExpressionKind, window: Window) -> String {
    format!(
        "I don't have any receipt data for {}.",
        period_label(kind, window)
    )
}

/// Scope `receipts` to the period named by `kind` and package the result.
pub fn ground_question(
    question: &str,
    kind: TimeExpressionKind,
    receipts: &[Receipt],
    reference: NaiveDate,
    max_receipts: usize,
) -> Result<Grounding> {
    let (window, scoped) = scope_receipts(receipts, kind, reference)
        .with_context(|| format!("cannot resolve {kind} relative to {reference}"))?;

    if scoped.is_empty {
        tracing::info!(%kind, %window, "no receipts in requested period");
        return Ok(Grounding::NoData {
            kind,
            window,
            statement: absence_statement(kind, window),
        });
    }

    let window_total: f64 = scoped.matched.iter().map(|r| r.total).sum();
    let window_categories = category_totals(&scoped.matched);
    let window_receipt_count = scoped.matched.len();

    let mut in_scope = scoped.matched;
    // Unparseable dates only survive in unbounded scopes; keep them last
    in_scope.sort_by(|a, b| b.calendar_date().ok().cmp(&a.calendar_date().ok()));
    let omitted = in_scope.len().saturating_sub(max_receipts);
    in_scope.truncate(max_receipts);

    Ok(Grounding::Context(GroundedContext {
        question: question.to_string(),
        kind,
        window,
        period: period_label(kind, window),
        receipts: in_scope,
        omitted,
        window_total,
        window_categories,
        window_receipt_count,
    }))
}

/// Ask the collaborator only when there is grounded data to answer from.
pub fn answer_grounded<A: AnsweringCollaborator + ?Sized>(
    collaborator: &A,
    grounding: &Grounding,
) -> Result<String> {
    match grounding {
        Grounding::NoData { statement, .. } => Ok(statement.clone()),
        Grounding::Context(ctx) => collaborator.answer(ctx).context("answering collaborator failed"),
    }
}

impl GroundedContext {
    pub fn system_prompt(&self) -> String {
        let mut s = String::new();
        s.push_str("You are a personal finance assistant answering questions about the user's receipts.\n");
        s.push_str("Answer ONLY from the receipt data provided below. Do not estimate, extrapolate or ");
        s.push_str("use any knowledge about spending outside this data.\n");
        match self.window {
            Window::Bounded { start, end } => {
                s.push_str(&format!(
                    "The data covers {} only ({} to {} inclusive). Do not state figures for any other period; ",
                    self.period, start, end
                ));
                s.push_str("if asked about one, say that you only have data for this period.\n");
            }
            Window::Unbounded => {
                s.push_str("The data covers all receipts on file.\n");
                if self.window_receipt_count == 0 {
                    s.push_str("There are no receipts on file; say so.\n");
                }
            }
        }
        s.push_str("Amounts are in the currency printed on each receipt and are never converted.\n");
        s
    }

    pub fn receipts_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.receipts).context("serialize grounded receipts")
    }

    /// System prompt, precomputed window figures and receipts as one text block.
    pub fn render_prompt(&self) -> Result<String> {
        let mut s = self.system_prompt();
        s.push_str(&format!(
            "\nPeriod totals ({} receipts): total {:.2}\n",
            self.window_receipt_count, self.window_total
        ));
        for c in &self.window_categories {
            s.push_str(&format!("- {}: {:.2}\n", c.name, c.amount));
        }
        if self.omitted > 0 {
            s.push_str(&format!(
                "\n{} older receipts in this period are summarized above but not listed.\n",
                self.omitted
            ));
        }
        s.push_str("\nReceipts:\n");
        s.push_str(&self.receipts_json()?);
        s.push_str(&format!("\n\nQuestion: {}\n", self.question));
        Ok(s)
    }
}
