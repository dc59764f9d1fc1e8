//! Human-readable renderings of messages and result points.
//!
//! Pure formatting over already-computed values; nothing here touches
//! the pipeline.

use std::fmt::Write;

use sl_analysis::{FinalSummaryRow, LoadResult, NoLoadResult};
use sl_table::ValidationMessage;

pub fn format_validation_messages(messages: &[ValidationMessage]) -> String {
    if messages.is_empty() {
        return "No validation messages\n".to_string();
    }

    let mut out = String::new();
    for msg in messages {
        let mut location = String::new();
        if let Some(line) = msg.line {
            let _ = write!(location, "line {line}");
        }
        if let Some(column) = &msg.column {
            if !location.is_empty() {
                location.push_str(", ");
            }
            let _ = write!(location, "column {column}");
        }
        if location.is_empty() {
            let _ = writeln!(out, "  {:<7} {}", msg.severity.label(), msg.text);
        } else {
            let _ = writeln!(out, "  {:<7} {}: {}", msg.severity.label(), location, msg.text);
        }
    }
    out
}

pub fn format_no_load_summary(points: &[NoLoadResult]) -> String {
    if points.is_empty() {
        return "No no-load results\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:>6}  {:>8}  {:>8}  {:>10}  {:>10}",
        "STEP%", "U [V]", "R [ohm]", "Pcu_s [W]", "P0' [W]"
    );
    for p in points {
        let _ = writeln!(
            out,
            "  {:>6.1}  {:>8.1}  {:>8.4}  {:>10.1}  {:>10.1}",
            p.step_pct,
            p.voltage_v,
            p.corrected_resistance_ohm,
            p.stator_copper_loss_w,
            p.corrected_power_w
        );
    }
    out
}

pub fn format_load_summary(points: &[LoadResult]) -> String {
    if points.is_empty() {
        return "No load results\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:>6}  {:>8}  {:>10}  {:>10}  {:>10}  {:>10}",
        "STEP%", "slip", "P2 [W]", "Pcu_s [W]", "Pcu_r [W]", "Pres [W]"
    );
    for p in points {
        let _ = writeln!(
            out,
            "  {:>6.1}  {:>8.5}  {:>10.1}  {:>10.1}  {:>10.1}  {:>10.1}",
            p.step_pct,
            p.slip,
            p.output_power_w,
            p.stator_copper_loss_w,
            p.rotor_copper_loss_w,
            p.residual_loss_w
        );
    }
    out
}

pub fn format_summary_rows(rows: &[FinalSummaryRow]) -> String {
    if rows.is_empty() {
        return "No summary rows\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:>6}  {:>10}  {:>10}  {:>9}  {:>8}  {:>8}  {:>8}",
        "LOAD%", "Pcu_s [W]", "Pcu_r [W]", "Padd [W]", "Pfw [W]", "Pfe [W]", "eta [%]"
    );
    for r in rows {
        let _ = writeln!(
            out,
            "  {:>6.1}  {:>10.1}  {:>10.1}  {:>9.1}  {:>8.1}  {:>8.1}  {:>8.2}",
            r.load_pct,
            r.stator_copper_loss_w,
            r.rotor_copper_loss_w,
            r.additional_loss_w,
            r.friction_windage_loss_w,
            r.iron_loss_w,
            r.efficiency_pct
        );
    }
    out
}
