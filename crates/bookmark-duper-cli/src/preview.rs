use bookmark_duper_core::{
    DeletionOutcome, DeletionStatus, DuplicateGroup, ItemKind, ScanReport, ScannedItem,
};
use chrono::Local;
use colored::*;

pub fn print_report(report: &ScanReport) {
    println!(
        "{}",
        format!(
            "Found {} duplicate bookmark(s) and {} duplicate folder(s)",
            report.duplicate_bookmarks, report.duplicate_folders
        )
        .yellow()
        .bold()
    );
    println!();
    println!("{}", "Preview of Duplicates to Delete:".bold());

    print_section(report, ItemKind::Bookmark, "Duplicate Bookmarks:");
    print_section(report, ItemKind::Folder, "Duplicate Folders:");
}

fn print_section(report: &ScanReport, kind: ItemKind, heading: &str) {
    let mut groups = report.groups_of(kind).peekable();
    if groups.peek().is_none() {
        return;
    }

    println!();
    println!("{}", heading.underline());
    for group in groups {
        print_group(group);
    }
}

fn print_group(group: &DuplicateGroup) {
    println!();
    match group.kind {
        ItemKind::Bookmark => println!("  {}", group.key.cyan()),
        ItemKind::Folder => println!("  {}", format!("Folder: \"{}\"", group.key).cyan()),
    }
    println!("    {} {}", "✓ KEEP (newest):".green().bold(), describe(&group.keep));
    for item in &group.delete {
        println!("    {} {}", "✗ DELETE:".red().bold(), describe(item));
    }
}

fn describe(item: &ScannedItem) -> String {
    let title = item
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled");
    let added = item
        .added_at()
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match item.kind {
        ItemKind::Bookmark => format!("{} {}", title, format!("(Added: {})", added).dimmed()),
        ItemKind::Folder => format!(
            "{} {}",
            title,
            format!("(Added: {} | {} item(s))", added, item.child_count).dimmed()
        ),
    }
}

pub fn print_no_duplicates() {
    println!("{}", "No duplicates found!".green().bold());
}

pub fn print_outcome(outcome: &DeletionOutcome) {
    match outcome.status() {
        DeletionStatus::Nothing => println!("Nothing to delete."),
        DeletionStatus::Success => println!(
            "{}",
            format!("Successfully deleted {} duplicate item(s)!", outcome.deleted)
                .green()
                .bold()
        ),
        DeletionStatus::TotalFailure => println!(
            "{}",
            format!(
                "No items were deleted. {} failed (may have been already deleted).",
                outcome.failed
            )
            .red()
            .bold()
        ),
        DeletionStatus::PartialFailure => println!(
            "{}",
            format!(
                "Deleted {} item(s). {} failed (may have been already deleted).",
                outcome.deleted, outcome.failed
            )
            .yellow()
            .bold()
        ),
    }
}
