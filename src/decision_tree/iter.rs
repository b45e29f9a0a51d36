use std::iter::Iterator;

use super::TreeNode;
use crate::dataset::Float;

/// Level-order (BFT) iterator of nodes in a decision tree
pub struct NodeIter<'a, F> {
    queue: Vec<&'a TreeNode<F>>,
}

impl<'a, F> NodeIter<'a, F> {
    pub fn new(queue: Vec<&'a TreeNode<F>>) -> Self {
        NodeIter { queue }
    }
}

impl<'a, F: Float> Iterator for NodeIter<'a, F> {
    type Item = &'a TreeNode<F>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop().map(|node| {
            node.children()
                .into_iter()
                .for_each(|child| self.queue.push(child));

            node
        })
    }
}
