use super::ActorSet;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(default)]
    pub uncertain: bool,
    #[serde(rename = "async")]
    #[serde(default)]
    pub is_async: bool,
}

impl Message {
    pub fn new(from: impl Into<String>, to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            text: text.into(),
            uncertain: false,
            is_async: false,
        }
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn uncertain(mut self) -> Self {
        self.uncertain = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    Opt,
    Alt,
}

impl ConditionKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ConditionKind::Opt => "opt",
            ConditionKind::Alt => "alt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    pub name: String,
    #[serde(rename = "trueBranch")]
    #[serde(default)]
    pub true_branch: Vec<Node>,
    #[serde(rename = "falseBranch")]
    #[serde(default)]
    pub false_branch: Vec<Node>,
}

impl Condition {
    /// Builder entry point used by structured editors; rejects an empty first branch.
    ///
    /// The parser constructs conditions directly and may legitimately produce empty branches
    /// from hand-written text.
    pub fn new(
        kind: ConditionKind,
        name: impl Into<String>,
        true_branch: Vec<Node>,
    ) -> Result<Self> {
        if true_branch.is_empty() {
            return Err(Error::EmptyBranch);
        }
        Ok(Self {
            kind,
            name: name.into(),
            true_branch,
            false_branch: Vec::new(),
        })
    }

    pub fn with_false_branch(mut self, false_branch: Vec<Node>) -> Self {
        self.false_branch = false_branch;
        self
    }

    pub(crate) fn empty(kind: ConditionKind, name: String) -> Self {
        Self {
            kind,
            name,
            true_branch: Vec::new(),
            false_branch: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loop {
    pub condition: String,
    #[serde(default)]
    pub body: Vec<Node>,
}

impl Loop {
    pub fn new(condition: impl Into<String>, body: Vec<Node>) -> Self {
        Self {
            condition: condition.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parallel {
    pub branches: Vec<Vec<Node>>,
}

impl Parallel {
    pub fn new(branches: Vec<Vec<Node>>) -> Self {
        Self { branches }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Message(Message),
    Condition(Condition),
    Loop(Loop),
    Parallel(Parallel),
}

impl Node {
    /// Condition, loop and parallel nodes.
    pub fn is_block(&self) -> bool {
        !matches!(self, Node::Message(_))
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Node::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Direct child lists, in rendering order.
    pub fn children(&self) -> Vec<&[Node]> {
        match self {
            Node::Message(_) => Vec::new(),
            Node::Condition(c) => vec![c.true_branch.as_slice(), c.false_branch.as_slice()],
            Node::Loop(l) => vec![l.body.as_slice()],
            Node::Parallel(p) => p.branches.iter().map(Vec::as_slice).collect(),
        }
    }
}

impl From<Message> for Node {
    fn from(value: Message) -> Self {
        Node::Message(value)
    }
}

impl From<Condition> for Node {
    fn from(value: Condition) -> Self {
        Node::Condition(value)
    }
}

impl From<Loop> for Node {
    fn from(value: Loop) -> Self {
        Node::Loop(value)
    }
}

impl From<Parallel> for Node {
    fn from(value: Parallel) -> Self {
        Node::Parallel(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStatistics {
    pub actors: usize,
    pub top_level_nodes: usize,
    pub messages: usize,
    pub blocks: usize,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub actors: ActorSet,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty() && self.nodes.is_empty()
    }

    /// Appends a node, inserting any actor it references that is not selected yet.
    pub fn push(&mut self, node: impl Into<Node>) {
        let node = node.into();
        insert_referenced(&mut self.actors, std::slice::from_ref(&node));
        self.nodes.push(node);
    }

    /// Re-establishes the invariant that every message endpoint is a selected actor.
    pub fn ensure_referenced_actors(&mut self) {
        insert_referenced(&mut self.actors, &self.nodes);
    }

    pub fn statistics(&self) -> DocumentStatistics {
        fn walk(nodes: &[Node], depth: usize, stats: &mut DocumentStatistics) {
            for node in nodes {
                match node {
                    Node::Message(_) => {
                        stats.messages += 1;
                        stats.max_depth = stats.max_depth.max(depth);
                    }
                    other => {
                        stats.blocks += 1;
                        stats.max_depth = stats.max_depth.max(depth + 1);
                        for children in other.children() {
                            walk(children, depth + 1, stats);
                        }
                    }
                }
            }
        }

        let mut stats = DocumentStatistics {
            actors: self.actors.len(),
            top_level_nodes: self.nodes.len(),
            ..Default::default()
        };
        walk(&self.nodes, 0, &mut stats);
        stats
    }
}

fn insert_referenced(actors: &mut ActorSet, nodes: &[Node]) {
    for node in nodes {
        match node {
            Node::Message(m) => {
                if !actors.contains(&m.from) {
                    actors.insert(m.from.clone());
                }
                if !actors.contains(&m.to) {
                    actors.insert(m.to.clone());
                }
            }
            other => {
                for children in other.children() {
                    insert_referenced(actors, children);
                }
            }
        }
    }
}
