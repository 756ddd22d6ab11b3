//! Class tree built from asset paths
//!
//! A [`ClassNode`] mirrors one folder level of the scanned assets. Leaf
//! constants keep their insertion order, child classes are kept sorted by
//! name so output is stable whatever order the file system enumerates in.

use crate::ident::sanitize_identifier;
use hashbrown::HashMap;
use std::collections::BTreeMap;

/// A string constant declared inside a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub value: String,
}

/// One entry of a class body, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// A `//` comment line
    Comment(String),
    Constant(Constant),
}

/// Static class node
#[derive(Debug, Clone, Default)]
pub struct ClassNode {
    name: String,
    members: Vec<Member>,
    /// Constant name -> index into `members`
    constant_index: HashMap<String, usize>,
    children: BTreeMap<String, ClassNode>,
}

impl ClassNode {
    /// Create an empty class
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Body members in declaration order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Constants in declaration order
    pub fn constants(&self) -> impl Iterator<Item = &Constant> {
        self.members.iter().filter_map(|m| match m {
            Member::Constant(c) => Some(c),
            Member::Comment(_) => None,
        })
    }

    /// Look up a constant value by name
    pub fn constant(&self, name: &str) -> Option<&str> {
        self.constant_index
            .get(name)
            .and_then(|&idx| match &self.members[idx] {
                Member::Constant(c) => Some(c.value.as_str()),
                Member::Comment(_) => None,
            })
    }

    /// Child classes, sorted by name
    pub fn children(&self) -> impl Iterator<Item = &ClassNode> {
        self.children.values()
    }

    pub fn child(&self, name: &str) -> Option<&ClassNode> {
        self.children.get(name)
    }

    /// Get the child class with this name, creating it when absent
    pub fn get_or_add_child(&mut self, name: &str) -> &mut ClassNode {
        self.children
            .entry(name.to_string())
            .or_insert_with(|| ClassNode::new(name))
    }

    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.members.push(Member::Comment(text.into()));
    }

    /// Declare a constant.
    ///
    /// A repeated name keeps its original position and takes the new value;
    /// returns `false` in that case.
    pub fn add_constant(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        let value = value.into();

        if let Some(&idx) = self.constant_index.get(&name) {
            if let Member::Constant(existing) = &mut self.members[idx] {
                log::warn!(
                    "Duplicate constant {}.{}: \"{}\" replaced by \"{}\"",
                    self.name,
                    name,
                    existing.value,
                    value
                );
                existing.value = value;
            }
            return false;
        }

        self.constant_index.insert(name.clone(), self.members.len());
        self.members.push(Member::Constant(Constant { name, value }));
        true
    }

    /// Add `comment` unless the body already has that comment line
    pub fn open_section(&mut self, comment: &str) {
        if self.section_start(comment).is_none() {
            self.add_comment(comment);
        }
    }

    /// Declare a constant at the end of the section headed by `comment`.
    ///
    /// The section runs up to the next comment line. A missing section is
    /// opened at the end of the body first. Repeated names behave as in
    /// [`ClassNode::add_constant`].
    pub fn add_constant_in_section(
        &mut self,
        comment: &str,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let name = name.into();
        if self.constant_index.contains_key(&name) {
            return self.add_constant(name, value);
        }

        let start = match self.section_start(comment) {
            Some(start) => start,
            None => {
                self.add_comment(comment);
                return self.add_constant(name, value);
            }
        };
        let end = self.members[start + 1..]
            .iter()
            .position(|m| matches!(m, Member::Comment(_)))
            .map_or(self.members.len(), |offset| start + 1 + offset);

        for idx in self.constant_index.values_mut() {
            if *idx >= end {
                *idx += 1;
            }
        }
        self.constant_index.insert(name.clone(), end);
        self.members.insert(
            end,
            Member::Constant(Constant {
                name,
                value: value.into(),
            }),
        );
        true
    }

    fn section_start(&self, comment: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|m| matches!(m, Member::Comment(text) if text == comment))
    }

    /// Insert a constant at the location given by a relative path.
    ///
    /// `path` is relative to the scan root with its extension removed; both
    /// `/` and `\` separate segments. Every segment except the last becomes a
    /// nested class (sanitized), `leaf` is the constant name and the value is
    /// `path` with `\` normalized to `/`.
    pub fn insert_path(&mut self, path: &str, leaf: &str) -> bool {
        let segments: Vec<&str> = path.split(['/', '\\']).collect();
        let folders = &segments[..segments.len().saturating_sub(1)];

        let mut node = self;
        for folder in folders {
            node = node.get_or_add_child(&sanitize_identifier(folder));
        }

        node.add_constant(leaf, path.replace('\\', "/"))
    }

    /// Number of constants in this class and all nested classes
    pub fn constant_count(&self) -> usize {
        self.constant_index.len()
            + self
                .children
                .values()
                .map(ClassNode::constant_count)
                .sum::<usize>()
    }

    /// True when the class has no members and no children
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(node: &ClassNode) -> Vec<&str> {
        node.children().map(|c| c.name()).collect()
    }

    #[test]
    fn test_insert_nested_paths() {
        let mut root = ClassNode::new("ResourcesConstants");
        root.insert_path("a/b/c", "c");
        root.insert_path("a/b/d", "d");
        root.insert_path("a/e", "e");

        assert_eq!(names(&root), vec!["a"]);
        let a = root.child("a").unwrap();
        assert_eq!(names(a), vec!["b"]);
        assert_eq!(a.constant("e"), Some("a/e"));

        let b = a.child("b").unwrap();
        let consts: Vec<_> = b.constants().map(|c| c.name.as_str()).collect();
        assert_eq!(consts, vec!["c", "d"]);
        assert_eq!(b.constant("d"), Some("a/b/d"));
        assert_eq!(root.constant_count(), 3);
    }

    #[test]
    fn test_children_sorted_regardless_of_insert_order() {
        let mut root = ClassNode::new("Root");
        root.insert_path("a/e/f", "f");
        root.insert_path("a/b/c", "c");

        let a = root.child("a").unwrap();
        assert_eq!(names(a), vec!["b", "e"]);
    }

    #[test]
    fn test_backslash_paths_normalized() {
        let mut root = ClassNode::new("Root");
        root.insert_path("Props\\Crates\\Big Crate", "Big_Crate");

        let crates = root.child("Props").unwrap().child("Crates").unwrap();
        assert_eq!(crates.constant("Big_Crate"), Some("Props/Crates/Big Crate"));
    }

    #[test]
    fn test_folder_segments_sanitized() {
        let mut root = ClassNode::new("Root");
        root.insert_path("2D Sprites/UI-Icons/close", "close");

        let ui = root.child("_2D_Sprites").unwrap().child("UI_Icons").unwrap();
        assert_eq!(ui.constant("close"), Some("2D Sprites/UI-Icons/close"));
    }

    #[test]
    fn test_top_level_file_lands_on_root() {
        let mut root = ClassNode::new("Root");
        root.insert_path("Player", "Player");
        assert_eq!(root.constant("Player"), Some("Player"));
        assert_eq!(root.children().count(), 0);
    }

    #[test]
    fn test_duplicate_constant_last_write_wins() {
        let mut root = ClassNode::new("Root");
        assert!(root.add_constant("Hit", "Sfx/Hit"));
        assert!(root.add_constant("Miss", "Sfx/Miss"));
        assert!(!root.add_constant("Hit", "Sfx/Hit-2"));

        let consts: Vec<_> = root
            .constants()
            .map(|c| (c.name.as_str(), c.value.as_str()))
            .collect();
        assert_eq!(consts, vec![("Hit", "Sfx/Hit-2"), ("Miss", "Sfx/Miss")]);
        assert_eq!(root.constant_count(), 2);
    }

    #[test]
    fn test_comments_not_counted() {
        let mut node = ClassNode::new("MainMixer");
        node.add_comment("Exposed Parameters");
        node.add_constant("Volume", "Volume");
        assert_eq!(node.members().len(), 2);
        assert_eq!(node.constant_count(), 1);
        assert!(!node.is_empty());
    }

    #[test]
    fn test_add_constant_in_section() {
        let mut node = ClassNode::new("MainMixer");
        node.open_section("Params");
        node.add_constant_in_section("Params", "Vol", "Vol");
        node.open_section("Groups");
        node.add_constant_in_section("Groups", "Group_Sfx", "Sfx");

        node.open_section("Params");
        node.add_constant_in_section("Params", "Pitch", "Pitch");
        node.add_constant_in_section("Groups", "Group_Music", "Music");

        let body: Vec<String> = node
            .members()
            .iter()
            .map(|m| match m {
                Member::Comment(text) => format!("// {}", text),
                Member::Constant(c) => c.name.clone(),
            })
            .collect();
        assert_eq!(
            body,
            vec!["// Params", "Vol", "Pitch", "// Groups", "Group_Sfx", "Group_Music"]
        );
        assert_eq!(node.constant("Group_Sfx"), Some("Sfx"));
        assert_eq!(node.constant("Pitch"), Some("Pitch"));

        assert!(!node.add_constant_in_section("Groups", "Vol", "Vol2"));
        assert_eq!(node.constant("Vol"), Some("Vol2"));
    }

    #[test]
    fn test_add_constant_in_missing_section_appends() {
        let mut node = ClassNode::new("Root");
        node.add_constant_in_section("Groups", "Group_Sfx", "Sfx");
        assert_eq!(node.members()[0], Member::Comment("Groups".to_string()));
        assert_eq!(node.constant_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_children_strictly_sorted(
            paths in proptest::collection::vec("[a-d]{1,2}(/[a-d]{1,2}){0,3}", 1..20)
        ) {
            let mut root = ClassNode::new("Root");
            for p in &paths {
                let leaf = p.rsplit('/').next().unwrap().to_string();
                root.insert_path(p, &leaf);
            }

            fn check(node: &ClassNode) -> bool {
                let names: Vec<&str> = node.children().map(|c| c.name()).collect();
                names.windows(2).all(|w| w[0] < w[1]) && node.children().all(check)
            }
            prop_assert!(check(&root));
        }
    }
}
