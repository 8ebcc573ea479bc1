//! The recipe build tree and its canonical signature (§3, §4.2).

use std::sync::Arc;

use crate::store::Store;

/// A binary build tree. Leaves are basic elements; interior nodes carry
/// the two children that combine into their element.
///
/// Children are `Arc`-shared rather than owned outright: the multi-recipe
/// enumerator's per-element cache (§4.4) hands out the same subtree to
/// many parent candidates, the same way the teacher's content-addressable
/// blob store shares one on-disk payload across many installed kegs
/// instead of duplicating it per keg. `Arc` rather than `Rc` because the
/// concurrent driver in `alchemy_service` shares trees across worker
/// threads; the atomic refcount costs nothing extra on the sequential path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        element: String,
    },
    Interior {
        element: String,
        left: Arc<Node>,
        right: Arc<Node>,
    },
}

impl Node {
    pub fn leaf(element: impl Into<String>) -> Node {
        Node::Leaf {
            element: element.into(),
        }
    }

    pub fn interior(element: impl Into<String>, left: Arc<Node>, right: Arc<Node>) -> Node {
        Node::Interior {
            element: element.into(),
            left,
            right,
        }
    }

    /// The element at this node's root.
    pub fn element(&self) -> &str {
        match self {
            Node::Leaf { element } => element,
            Node::Interior { element, .. } => element,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Depth in edges: a leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Interior { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Canonical signature (§3): symmetric in ingredient order at every
    /// node, so `A+B` and `B+A` produce identical signatures.
    pub fn signature(&self) -> String {
        match self {
            Node::Leaf { element } => element.clone(),
            Node::Interior { element, left, right } => {
                let (a, b) = {
                    let ls = left.signature();
                    let rs = right.signature();
                    if ls <= rs { (ls, rs) } else { (rs, ls) }
                };
                format!("{element}({a},{b})")
            }
        }
    }

    /// Post-order flattening into a linear, executable build plan (§4.6).
    pub fn flatten(&self) -> Vec<Step> {
        let mut steps = Vec::new();
        self.flatten_into(&mut steps);
        steps
    }

    fn flatten_into(&self, steps: &mut Vec<Step>) {
        if let Node::Interior { element, left, right } = self {
            left.flatten_into(steps);
            right.flatten_into(steps);
            steps.push(Step {
                ingredients: [left.element().to_string(), right.element().to_string()],
                result: element.clone(),
            });
        }
    }

    /// §4.2 validator: every leaf is basic, every interior node is grounded
    /// in the store under either ingredient ordering, and tiers strictly
    /// decrease from every interior node to each of its children.
    pub fn is_valid(&self, store: &Store) -> bool {
        match self {
            Node::Leaf { element } => store.is_basic(element),
            Node::Interior { element, left, right } => {
                if !left.is_valid(store) || !right.is_valid(store) {
                    return false;
                }
                let result_tier = store.tier_of(element);
                let left_tier = store.tier_of(left.element());
                let right_tier = store.tier_of(right.element());
                if !left_tier.strictly_less_than(result_tier)
                    || !right_tier.strictly_less_than(result_tier)
                {
                    return false;
                }
                store
                    .combinations_of(element)
                    .iter()
                    .any(|c| c.matches_pair(left.element(), right.element()))
            }
        }
    }
}

/// One build step in a flattened plan: combine two ingredients into a
/// result. Leaves emit no step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub ingredients: [String; 2],
    pub result: String,
}
