use attest_core::{RecordKind, RecordStatus, RecordSummary};

/// Fixed system prompt for the compliance assistant. Every request uses
/// this verbatim — the user only supplies the question.
pub const SYSTEM_PROMPT: &str = "\
You are a compliance and audit assistant embedded in a compliance management \
workspace. Answer questions about compliance frameworks (SOC 2, ISO 27001, \
HIPAA, GDPR and similar), audit preparation, checklists, evidence documents \
and certificates.\n\n\
Ground rules:\n\
1. Answer from the workspace context when it is provided — refer to records \
by their display names.\n\
2. Be concrete. Name the control, clause, or document type rather than giving \
generic advice.\n\
3. You are not a lawyer or an accredited auditor. For questions that need a \
formal legal or certification opinion, say so and point the user to their \
auditor.\n\
4. Keep answers short: a direct answer first, supporting detail after.\n\
5. Never invent records that are not in the provided context.";

/// Build the user message: the question, preceded by a compact listing of
/// the caller's records so the model can refer to them.
pub fn user_message(question: &str, records: &[RecordSummary]) -> String {
    let mut out = String::with_capacity(256 + records.len() * 48);

    if !records.is_empty() {
        out.push_str("WORKSPACE RECORDS:\n");
        for record in records {
            out.push_str("- [");
            out.push_str(kind_str(record.kind));
            out.push_str("] \"");
            out.push_str(&record.name);
            out.push_str("\" (");
            out.push_str(status_str(record.status));
            out.push_str(")\n");
        }
        out.push('\n');
    }

    out.push_str("QUESTION:\n");
    out.push_str(question.trim());
    out
}

fn kind_str(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Tenant => "tenant",
        RecordKind::Framework => "framework",
        RecordKind::Checklist => "checklist",
        RecordKind::Audit => "audit",
        RecordKind::Document => "document",
        RecordKind::Certificate => "certificate",
    }
}

fn status_str(status: RecordStatus) -> &'static str {
    match status {
        RecordStatus::Draft => "draft",
        RecordStatus::Active => "active",
        RecordStatus::Archived => "archived",
    }
}
