//! Text rendering of resources, sync reports and ratings.

use hub_core::{CategoryTags, RatingSummary, Resource, SyncReport};

use super::tables::{format_rating, truncate_string};

const TABLE_WIDTH: usize = 96;

/// Render resources as a fixed-width table.
pub fn format_resource_table(resources: &[Resource]) -> String {
    if resources.is_empty() {
        return "No resources found. Run 'hub sync <owner> <repository>' to import a catalog."
            .to_string();
    }

    let mut lines = vec![
        format!(
            "{:<5} {:<28} {:<9} {:<6} {:<9} {:<4} Tags",
            "ID", "Name", "Kind", "Rating", "Downloads", "Ver"
        ),
        "-".repeat(TABLE_WIDTH),
    ];
    lines.extend(resources.iter().map(|resource| {
        format!(
            "{:<5} {:<28} {:<9} {:<6} {:<9} {:<4} {}",
            resource.id,
            truncate_string(&resource.name, 27),
            resource.kind.as_str(),
            format_rating(resource.rating),
            resource.downloads,
            if resource.verified { "yes" } else { "no" },
            truncate_string(&resource.tags.join(", "), 30),
        )
    }));
    lines.push(String::new());
    lines.push(format!("{} resource(s)", resources.len()));
    lines.join("\n")
}

/// Render one resource with all of its fields.
pub fn format_resource_detail(resource: &Resource) -> String {
    let github = &resource.github;
    let mut lines = vec![
        format!("{} (ID {})", resource.name, resource.id),
        format!("  Kind:        {}", resource.kind),
        format!(
            "  Source:      {}/{}@{}:{}",
            github.owner, github.repository, github.git_ref, github.path
        ),
    ];
    if github.has_readme() {
        lines.push(format!("  README:      {}", github.readme_path));
    }
    lines.push(format!("  Verified:    {}", resource.verified));
    if let Some(user_id) = resource.user_id {
        lines.push(format!("  Submitted by user {user_id}"));
    }
    lines.push(format!("  Rating:      {}", format_rating(resource.rating)));
    lines.push(format!("  Downloads:   {}", resource.downloads));
    lines.push(format!("  Tags:        {}", resource.tags.join(", ")));
    lines.push(format!("  Categories:  {}", resource.categories.join(", ")));
    lines.push(format!(
        "  Updated:     {}",
        resource.updated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    if !resource.description.is_empty() {
        lines.push(String::new());
        lines.push(resource.description.clone());
    }
    lines.join("\n")
}

/// Render the outcome of a sync pass, failures sorted by directory.
pub fn format_sync_report(report: &SyncReport) -> String {
    let mut lines = vec![format!(
        "Inserted {}, updated {}, unchanged {}, not resources {}, failed {}",
        report.inserted, report.updated, report.skipped, report.not_resources, report.failed
    )];
    if report.cancelled {
        lines.push("Sync was cancelled; committed directories are kept.".to_string());
    }
    lines.extend(report.failures.iter().map(|failure| {
        format!(
            "  {:<24} {:<18} {}",
            failure.directory,
            failure.kind.as_str(),
            failure.message
        )
    }));
    lines.join("\n")
}

pub fn format_rating_summary(summary: &RatingSummary) -> String {
    format!(
        "Resource {}: average {} from {} rating(s)",
        summary.resource_id,
        format_rating(summary.average),
        summary.count
    )
}

pub fn format_categories(categories: &[CategoryTags]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }
    categories
        .iter()
        .map(|category| format!("{}: {}", category.name, category.tags.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::{ErrorKind, GithubDetails, ResourceKind, SyncFailure};

    fn resource() -> Resource {
        let stamp = "2024-03-01T12:00:00Z".parse().unwrap();
        Resource {
            id: 42,
            name: "git-clone".to_string(),
            description: "Clones a repository.".to_string(),
            kind: ResourceKind::Task,
            rating: 4.5,
            downloads: 12,
            verified: true,
            user_id: None,
            github: GithubDetails {
                owner: "tektoncd".to_string(),
                repository: "catalog".to_string(),
                git_ref: "main".to_string(),
                path: "git-clone/git-clone.yaml".to_string(),
                readme_path: "git-clone/README.md".to_string(),
            },
            tags: vec!["git".to_string()],
            categories: vec!["git".to_string()],
            content_hash: String::new(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_empty_table_hints_at_sync() {
        assert!(format_resource_table(&[]).contains("hub sync"));
    }

    #[test]
    fn test_table_row() {
        let table = format_resource_table(&[resource()]);
        assert!(table.contains("git-clone"));
        assert!(table.contains("4.5"));
        assert!(table.ends_with("1 resource(s)"));
    }

    #[test]
    fn test_table_layout() {
        let table = format_resource_table(&[resource(), resource()]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("ID    Name"));
        assert_eq!(lines[1], "-".repeat(TABLE_WIDTH));
        assert!(lines[2].starts_with("42    git-clone"));
        assert!(lines[4].is_empty());
    }

    #[test]
    fn test_cancelled_sync_report() {
        let report = SyncReport {
            cancelled: true,
            ..SyncReport::default()
        };
        let text = format_sync_report(&report);
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("committed directories are kept."));
    }

    #[test]
    fn test_detail() {
        let detail = format_resource_detail(&resource());
        assert!(detail.starts_with("git-clone (ID 42)"));
        assert!(detail.contains("tektoncd/catalog@main:git-clone/git-clone.yaml"));
        assert!(detail.contains("README:      git-clone/README.md"));
        assert!(detail.contains("2024-03-01 12:00:00"));
        assert!(detail.ends_with("Clones a repository."));
    }

    #[test]
    fn test_sync_report_lists_failures() {
        let report = SyncReport {
            inserted: 2,
            failed: 1,
            failures: vec![SyncFailure {
                directory: "broken".to_string(),
                kind: ErrorKind::Validation,
                message: "unsupported kind".to_string(),
            }],
            ..SyncReport::default()
        };
        let text = format_sync_report(&report);
        assert!(text.starts_with("Inserted 2, updated 0"));
        assert!(text.contains("broken"));
        assert!(text.contains("validation"));
        assert!(!text.contains("cancelled"));
    }
}
