use depcmd_core::filter::{CategoryDisplayInfo, ProjectTypeStats};
use depcmd_core::{CommandDefinition, ProjectDetectionResult, ProjectTypeTrace, UserCommand};
use std::collections::BTreeMap;

pub fn print_header(title: &str) {
    println!("{title}");
    println!("{}", "=".repeat(80));
}

pub fn print_detection(result: &ProjectDetectionResult, details: bool) {
    let root = result
        .workspace_root
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<none>".to_string());
    print_header(&format!("🔍 Workspace: {root}"));

    if result.is_unknown() {
        println!("❓ No known project type detected");
    } else {
        println!("📦 Project types:");
        for detected in &result.detected_project_types {
            println!(
                "   • {} ({}) score {} confidence {}%",
                detected.display_name, detected.id, detected.score, detected.confidence
            );
        }
    }

    if !result.detected_package_managers.is_empty() {
        println!("\n🧰 Package managers:");
        for manager in &result.detected_package_managers {
            println!(
                "   • {} [{}] score {}",
                manager.display_name, manager.project_type, manager.score
            );
        }
    }

    if let Some(manager) = &result.package_manager {
        println!("\n   📌 JavaScript manager: {manager}");
    }
    if let Some(manager) = &result.python_manager {
        println!("   🐍 Python manager: {manager}");
    }
    println!(
        "\n   git: {}   docker: {}",
        yes_no(result.has_git),
        yes_no(result.has_docker)
    );

    if details {
        println!("\n🔬 Scoring details:");
        for trace in &result.detection_details {
            print_trace(trace);
        }
    }
}

fn print_trace(trace: &ProjectTypeTrace) {
    let veto = if trace.required_failed {
        " (required rule failed)"
    } else {
        ""
    };
    println!(
        "   {} {}/{}{veto}",
        trace.project_type, trace.score, trace.max_possible_score
    );
    for rule in &trace.rules {
        let mark = if rule.matched { "✅" } else { "❌" };
        match &rule.details {
            Some(details) => println!("      {mark} {} +{} {details}", rule.name, rule.score),
            None => println!("      {mark} {} +{}", rule.name, rule.score),
        }
    }
}

pub fn print_scripts(result: &ProjectDetectionResult) {
    let mut any = false;
    for detected in &result.detected_project_types {
        if detected.scripts.is_empty() {
            continue;
        }
        any = true;
        println!("\n📜 {} scripts:", detected.display_name);
        let width = detected
            .scripts
            .iter()
            .map(|s| s.name.len())
            .max()
            .unwrap_or(0);
        for script in &detected.scripts {
            println!("   {:width$}  {}", script.name, script.command);
        }
    }
    if !any {
        println!("No scripts found");
    }
}

pub fn print_categories(
    supported: &[(String, CategoryDisplayInfo)],
    stats: Option<&ProjectTypeStats>,
) {
    println!("🗂️  Categories:");
    for (id, info) in supported {
        println!("   • {} [{id}] ({})", info.display_name, info.icon);
    }

    if let Some(stats) = stats {
        println!(
            "\n   {} of {} categories apply",
            stats.supported_categories, stats.total_categories
        );
        if !stats.unsupported_categories.is_empty() {
            println!("   Hidden: {}", stats.unsupported_categories.join(", "));
        }
    }
}

pub fn print_command_groups(
    catalog: &[CommandDefinition],
    stored: &[UserCommand],
    display: impl Fn(&str) -> CategoryDisplayInfo,
) {
    let mut groups: BTreeMap<&str, Vec<(String, &str)>> = BTreeMap::new();
    for command in catalog {
        groups
            .entry(command.category.as_str())
            .or_default()
            .push((command.label.clone(), command.command.as_str()));
    }
    for command in stored {
        groups
            .entry(command.category.as_str())
            .or_default()
            .push((format!("{} (#{})", command.label, command.id), command.command.as_str()));
    }

    if groups.is_empty() {
        println!("No commands available");
        return;
    }

    for (category, commands) in groups {
        let info = display(category);
        println!("\n⚙️  {} [{category}]", info.display_name);
        for (label, command) in commands {
            println!("   • {label}: {command}");
        }
    }
}

pub fn print_stored_commands(commands: &[UserCommand]) {
    if commands.is_empty() {
        println!("No stored commands");
        return;
    }
    for command in commands {
        println!(
            "#{:<4} [{}] {}: {}",
            command.id, command.category, command.label, command.command
        );
        if let Some(description) = &command.description {
            println!("      {description}");
        }
    }
}

pub fn print_dependencies(results: &BTreeMap<String, bool>) {
    if results.is_empty() {
        println!("No dependency checks configured");
        return;
    }
    println!("🔧 Dependencies:");
    for (category, available) in results {
        let mark = if *available { "✅" } else { "❌" };
        println!("   {mark} {category}");
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
