//! Natural-language risk analysis built from the selected keywords.

use ds_core::profile::PersonProfile;
use ds_core::task::TaskCategory;

const POINT_NOTES: [&str; 3] = [
    "needs the closest attention",
    "monitor continuously during work",
    "strengthen preparation and pre-work checks",
];

const CLOSING: &str = "Given experience and personal traits, following safety procedures \
and wearing protective equipment matter most. Keep in close contact with coworkers \
to head off hazardous situations before they develop.";

/// Render the analysis text. The first three keywords become the primary
/// risk points; fewer keywords give fewer points.
pub fn analyze_risk(profile: &PersonProfile, task: &TaskCategory, keywords: &[String]) -> String {
    let name = profile.name();
    let task_name = task.display_name();

    let mut out = format!(
        "Risk analysis for {name}: {task_name}\n\n\
         Expected hazards for {name} (age {}) performing {task_name} work, \
         derived from the risk tables.\n\n\
         Primary risk points:\n",
        profile.age()
    );

    if keywords.is_empty() {
        out.push_str("• none identified\n");
    }
    for (keyword, note) in keywords.iter().zip(POINT_NOTES) {
        out.push_str(&format!("• {keyword}: {note}\n"));
    }

    out.push_str("\nPersonal notes:\n");
    out.push_str(CLOSING);
    out
}
