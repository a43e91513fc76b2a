use crate::normalize::{contains_phrase, normalize_text};
use crate::pubdate::parse_reference_time;
use crate::types::{AlertError, Result, Story};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt;
use std::sync::Arc;

/// Anything that can decide whether a story is worth surfacing.
///
/// Implementations must be pure: the same story always yields the same answer
/// and evaluation never mutates the predicate.
pub trait Evaluate {
    fn evaluate(&self, story: &Story) -> Result<bool>;
}

impl<T: Evaluate + ?Sized> Evaluate for &T {
    fn evaluate(&self, story: &Story) -> Result<bool> {
        (**self).evaluate(story)
    }
}

impl<T: Evaluate + ?Sized> Evaluate for Box<T> {
    fn evaluate(&self, story: &Story) -> Result<bool> {
        (**self).evaluate(story)
    }
}

impl<T: Evaluate + ?Sized> Evaluate for Arc<T> {
    fn evaluate(&self, story: &Story) -> Result<bool> {
        (**self).evaluate(story)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryField {
    Title,
    Description,
}

impl StoryField {
    fn text<'a>(&self, story: &'a Story) -> &'a str {
        match self {
            StoryField::Title => &story.title,
            StoryField::Description => &story.description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

/// Phrase already in normalized form, sentinel included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    normalized: String,
}

impl Phrase {
    pub fn new(phrase: &str) -> Result<Self> {
        let normalized = normalize_text(phrase);
        if normalized.trim().is_empty() {
            return Err(AlertError::config(format!(
                "phrase {:?} has no words left after normalization",
                phrase
            )));
        }
        Ok(Self { normalized })
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    pub fn is_in(&self, text: &str) -> bool {
        contains_phrase(&normalize_text(text), &self.normalized)
    }
}

/// Reference instant for BEFORE/AFTER triggers.
///
/// Every comparison happens in UTC. Story timestamps without a zone are
/// anchored at `assume_offset`, fixed when the trigger is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBound {
    pub reference: DateTime<Utc>,
    pub direction: Direction,
    pub assume_offset: FixedOffset,
}

impl TimeBound {
    fn fires(&self, story: &Story) -> Result<bool> {
        let published = story.published.ok_or_else(|| AlertError::MalformedStory {
            guid: story.guid.clone(),
            reason: "missing publication timestamp".to_string(),
        })?;
        let published = published.to_utc(self.assume_offset);

        Ok(match self.direction {
            Direction::Before => published < self.reference,
            Direction::After => published > self.reference,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Phrase(StoryField, Phrase),
    Time(TimeBound),
    Not(usize),
    And(usize, usize),
    Or(usize, usize),
}

/// A trigger tree.
///
/// Nodes live in a flat arena with the root stored last and children always
/// at lower indices, so neither evaluation nor dropping recurses.
#[derive(Clone, PartialEq, Eq)]
pub struct Trigger {
    nodes: Vec<Node>,
}

enum Step {
    Visit(usize),
    Negate,
    AndThen(usize),
    OrElse(usize),
}

impl Trigger {
    fn leaf(node: Node) -> Self {
        Self { nodes: vec![node] }
    }

    pub fn title(phrase: &str) -> Result<Self> {
        Ok(Self::leaf(Node::Phrase(StoryField::Title, Phrase::new(phrase)?)))
    }

    pub fn description(phrase: &str) -> Result<Self> {
        Ok(Self::leaf(Node::Phrase(StoryField::Description, Phrase::new(phrase)?)))
    }

    pub fn before(reference: DateTime<Utc>) -> Self {
        Self::time(reference, Direction::Before, Utc.fix())
    }

    pub fn after(reference: DateTime<Utc>) -> Self {
        Self::time(reference, Direction::After, Utc.fix())
    }

    pub fn time(reference: DateTime<Utc>, direction: Direction, assume_offset: FixedOffset) -> Self {
        Self::leaf(Node::Time(TimeBound {
            reference,
            direction,
            assume_offset,
        }))
    }

    /// BEFORE trigger from text such as `3 Oct 2016 17:00:10`, read in UTC.
    pub fn before_text(reference: &str) -> Result<Self> {
        Self::time_text(reference, Direction::Before, Utc.fix())
    }

    /// AFTER trigger from text such as `3 Oct 2016 17:00:10`, read in UTC.
    pub fn after_text(reference: &str) -> Result<Self> {
        Self::time_text(reference, Direction::After, Utc.fix())
    }

    pub fn time_text(reference: &str, direction: Direction, assume_offset: FixedOffset) -> Result<Self> {
        let reference = parse_reference_time(reference, assume_offset)?;
        Ok(Self::time(reference, direction, assume_offset))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Trigger) -> Self {
        let mut nodes = child.nodes;
        let root = nodes.len() - 1;
        nodes.push(Node::Not(root));
        Self { nodes }
    }

    pub fn and(left: Trigger, right: Trigger) -> Self {
        let (nodes, left, right) = Self::merge(left, right);
        Self::push_root(nodes, Node::And(left, right))
    }

    pub fn or(left: Trigger, right: Trigger) -> Self {
        let (nodes, left, right) = Self::merge(left, right);
        Self::push_root(nodes, Node::Or(left, right))
    }

    fn push_root(mut nodes: Vec<Node>, root: Node) -> Self {
        nodes.push(root);
        Self { nodes }
    }

    /// Concatenate two arenas, returning the root index of each side.
    /// The smaller arena is shifted onto the larger one so that building a
    /// long chain costs amortized O(n log n) node moves.
    fn merge(left: Trigger, right: Trigger) -> (Vec<Node>, usize, usize) {
        let left_root = left.root();
        let right_root = right.root();
        if left.nodes.len() >= right.nodes.len() {
            let (nodes, shift) = Self::append(left.nodes, right.nodes);
            (nodes, left_root, right_root + shift)
        } else {
            let (nodes, shift) = Self::append(right.nodes, left.nodes);
            (nodes, left_root + shift, right_root)
        }
    }

    fn append(mut base: Vec<Node>, extra: Vec<Node>) -> (Vec<Node>, usize) {
        let shift = base.len();
        base.extend(extra.into_iter().map(|node| match node {
            Node::Not(c) => Node::Not(c + shift),
            Node::And(l, r) => Node::And(l + shift, r + shift),
            Node::Or(l, r) => Node::Or(l + shift, r + shift),
            leaf => leaf,
        }));
        (base, shift)
    }

    fn root(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path, counting nodes.
    pub fn depth(&self) -> usize {
        // Children precede parents, so a single forward pass suffices.
        let mut depths: Vec<usize> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let depth = match node {
                Node::Phrase(..) | Node::Time(_) => 1,
                Node::Not(c) => depths[*c] + 1,
                Node::And(l, r) | Node::Or(l, r) => depths[*l].max(depths[*r]) + 1,
            };
            depths.push(depth);
        }
        depths.last().copied().unwrap_or(0)
    }

    fn evaluate_tree(&self, story: &Story) -> Result<bool> {
        let mut steps = vec![Step::Visit(self.root())];
        let mut values: Vec<bool> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(index) => match &self.nodes[index] {
                    Node::Phrase(field, phrase) => values.push(phrase.is_in(field.text(story))),
                    Node::Time(bound) => values.push(bound.fires(story)?),
                    Node::Not(child) => {
                        steps.push(Step::Negate);
                        steps.push(Step::Visit(*child));
                    }
                    Node::And(left, right) => {
                        steps.push(Step::AndThen(*right));
                        steps.push(Step::Visit(*left));
                    }
                    Node::Or(left, right) => {
                        steps.push(Step::OrElse(*right));
                        steps.push(Step::Visit(*left));
                    }
                },
                Step::Negate => {
                    let value = pop_value(&mut values);
                    values.push(!value);
                }
                // The right-hand value, if visited, becomes the result directly.
                Step::AndThen(right) => {
                    if pop_value(&mut values) {
                        steps.push(Step::Visit(right));
                    } else {
                        values.push(false);
                    }
                }
                Step::OrElse(right) => {
                    if pop_value(&mut values) {
                        values.push(true);
                    } else {
                        steps.push(Step::Visit(right));
                    }
                }
            }
        }

        Ok(pop_value(&mut values))
    }

    fn fmt_node(&self, index: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.nodes[index] {
            Node::Phrase(StoryField::Title, phrase) => write!(f, "TITLE({:?})", phrase.as_str().trim_end()),
            Node::Phrase(StoryField::Description, phrase) => {
                write!(f, "DESCRIPTION({:?})", phrase.as_str().trim_end())
            }
            Node::Time(bound) => match bound.direction {
                Direction::Before => write!(f, "BEFORE({})", bound.reference.to_rfc3339()),
                Direction::After => write!(f, "AFTER({})", bound.reference.to_rfc3339()),
            },
            Node::Not(child) => {
                f.write_str("NOT(")?;
                self.fmt_node(*child, f)?;
                f.write_str(")")
            }
            Node::And(left, right) | Node::Or(left, right) => {
                let op = if matches!(self.nodes[index], Node::And(..)) { "AND" } else { "OR" };
                write!(f, "{}(", op)?;
                self.fmt_node(*left, f)?;
                f.write_str(", ")?;
                self.fmt_node(*right, f)?;
                f.write_str(")")
            }
        }
    }
}

// Evaluation only pops after a matching push; an empty stack would be a bug in
// the step machine above, not a property of the story.
fn pop_value(values: &mut Vec<bool>) -> bool {
    values.pop().unwrap_or(false)
}

impl Evaluate for Trigger {
    fn evaluate(&self, story: &Story) -> Result<bool> {
        self.evaluate_tree(story)
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Deep trees would recurse here; summarize them instead.
        if self.depth() > 64 {
            return write!(f, "Trigger {{ nodes: {}, depth: {} }}", self.node_count(), self.depth());
        }
        self.fmt_node(self.root(), f)
    }
}
