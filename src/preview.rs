use crate::mirror::{EntryKind, TreeEntry};
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug)]
struct TreeNode {
    name: String,
    kind: EntryKind,
    children: Vec<Rc<RefCell<TreeNode>>>,
}
impl TreeNode {
    fn new(name: String, kind: EntryKind) -> Self {
        Self {
            name,
            kind,
            children: Vec::new(),
        }
    }
}

/// Links every entry under its parent. Walk order guarantees parents come first.
fn build_tree(entries: &[TreeEntry], destination: &Path) -> Rc<RefCell<TreeNode>> {
    let root_name = destination
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| destination.display().to_string());

    let root = Rc::new(RefCell::new(TreeNode::new(root_name, EntryKind::Directory)));

    let mut lookup: HashMap<PathBuf, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(PathBuf::new(), Rc::clone(&root));

    for entry in entries {
        // the source root maps onto the destination root
        let Some(name) = entry.relative.file_name() else {
            continue;
        };

        let parent = entry.relative.parent().unwrap_or_else(|| Path::new(""));
        let Some(parent_node) = lookup.get(parent).map(Rc::clone) else {
            log::debug!(
                "parent: {}, not found for path: {}",
                parent.display(),
                entry.relative.display()
            );
            continue;
        };

        let node = Rc::new(RefCell::new(TreeNode::new(
            name.to_string_lossy().to_string(),
            entry.kind,
        )));

        parent_node.borrow_mut().children.push(Rc::clone(&node));

        lookup.insert(entry.relative.clone(), node);
    }

    root
}

fn render_node(out: &mut String, node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool) {
    let node_borrow = node.borrow();

    let connector = if is_last { "└── " } else { "├── " };
    let name = match node_borrow.kind {
        EntryKind::Directory => node_borrow.name.blue(),
        EntryKind::File => node_borrow.name.green(),
        EntryKind::Symlink => node_borrow.name.cyan(),
    };
    out.push_str(&format!(
        "{}{}{}\n",
        prefix.yellow(),
        connector.yellow(),
        name
    ));

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        render_node(out, child, &child_prefix, i == len - 1);
    }
}

/// Renders `entries` as an ASCII tree rooted at the destination directory name.
pub fn render_tree(entries: &[TreeEntry], destination: &Path) -> String {
    let tree_root = build_tree(entries, destination);

    let mut out = String::new();
    render_node(&mut out, &tree_root, "", true);

    out
}

pub fn preview_as_tree(entries: &[TreeEntry], destination: &Path) {
    println!(
        "Legend: {} = (directory), {} = (file), {} = (symlink)",
        "blue".blue(),
        "green".green(),
        "cyan".cyan()
    );

    println!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    print!("{}", render_tree(entries, destination));

    println!(
        "\n{} {}",
        "└─".bold().bright_blue(),
        "Dry run, nothing was written".bright_green()
    );
}
