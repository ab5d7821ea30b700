use crate::export::task::ExportTask;

/// Drop tasks whose output document already exists.
///
/// The filesystem is the dedup ledger: an existing file at a task's
/// deterministic output path is the sole completion record, so the task is
/// skipped without touching the renderer. Returns the surviving tasks and
/// the number skipped. Existence checks only; nothing is mutated.
pub fn skip_existing(tasks: Vec<ExportTask>) -> (Vec<ExportTask>, usize) {
    let total = tasks.len();
    let pending: Vec<ExportTask> = tasks
        .into_iter()
        .filter(|task| {
            if task.output_path.exists() {
                tracing::debug!(
                    task = %task.display_name,
                    path = %task.output_path.display(),
                    "Output already exists, skipping"
                );
                false
            } else {
                true
            }
        })
        .collect();
    let skipped = total - pending.len();
    (pending, skipped)
}
