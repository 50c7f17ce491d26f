//! Category display formatting
//!
//! Renders the category tree with box-drawing branches and the detail view
//! for a single category.

use crate::models::{CategoryId, CategoryNode, CategoryTree, MoneyFormat};
use crate::services::category::CategoryDetail;

fn colored_name(node: &CategoryNode, color: bool) -> String {
    match node.color() {
        Some(c) if color => format!("\x1b[38;5;{}m{}\x1b[0m", c.ansi_code(), node.name()),
        _ => node.name().to_string(),
    }
}

fn node_line(tree: &CategoryTree, node: &CategoryNode, fmt: &MoneyFormat, color: bool) -> String {
    let mut line = colored_name(node, color);

    if let Some(alias) = node.alias_name() {
        line.push_str(&format!(" [alias: {}]", alias));
    }
    match (node.fixed_amount(), tree.monthly_budget(node.id())) {
        (Some(own), _) => line.push_str(&format!(" ({}/mo)", own.format(fmt))),
        (None, Some(rolled)) => line.push_str(&format!(" ({}/mo from subcategories)", rolled.format(fmt))),
        (None, None) => {}
    }
    line
}

fn push_children(
    tree: &CategoryTree,
    id: CategoryId,
    prefix: &str,
    fmt: &MoneyFormat,
    color: bool,
    output: &mut String,
) {
    let children = tree.children(id);
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{}{}{}\n", prefix, branch, node_line(tree, child, fmt, color)));

        let next_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        push_children(tree, child.id(), &next_prefix, fmt, color, output);
    }
}

/// Format the whole category tree, top-level categories separated by blank lines
pub fn format_category_tree(tree: &CategoryTree, fmt: &MoneyFormat, color: bool) -> String {
    if tree.is_empty() {
        return "No categories found.\n\nRun 'tally init' to create the starter categories.\n"
            .to_string();
    }

    let mut output = String::new();
    let roots = tree.roots();
    for (i, root) in roots.iter().enumerate() {
        output.push_str(&node_line(tree, root, fmt, color));
        output.push('\n');
        push_children(tree, root.id(), "", fmt, color, &mut output);

        if i < roots.len() - 1 {
            output.push('\n');
        }
    }

    if let Some(total) = tree.total_budget() {
        output.push_str(&format!("\nTotal monthly budget: {}\n", total.format(fmt)));
    }

    output
}

/// Format category details
pub fn format_category_details(detail: &CategoryDetail, fmt: &MoneyFormat) -> String {
    let node = &detail.node;
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", node.name()));
    output.push_str(&format!("  ID:       {}\n", node.id()));
    output.push_str(&format!("  Path:     {}\n", detail.path));

    if let Some(alias) = node.alias_name() {
        output.push_str(&format!("  Alias:    {}\n", alias));
    }
    if let Some(color) = node.color() {
        output.push_str(&format!("  Color:    {}\n", color.name()));
    }

    let own = node
        .fixed_amount()
        .map(|m| m.format(fmt))
        .unwrap_or_else(|| "-".to_string());
    output.push_str(&format!("  Own:      {}\n", own));

    let rolled = detail
        .monthly_budget
        .map(|m| m.format(fmt))
        .unwrap_or_else(|| "not budgeted".to_string());
    output.push_str(&format!("  Monthly:  {}\n", rolled));

    if detail.children.is_empty() {
        output.push_str("  Children: (none)\n");
    } else {
        output.push_str(&format!("  Children: {}\n", detail.children.join(", ")));
    }

    output
}
