use std::cmp::Ordering;
use std::fmt;

use crate::Outcome;
use crate::strategy::KeyStrategy;

const NIL: u32 = u32::MAX;

struct Node<K> {
    key: K,
    level: u32, // edges from the bucket root
    left: u32,
    right: u32,
}

impl<K> Node<K> {
    fn new(key: K, level: u32) -> Self {
        Self {
            key,
            level,
            left: NIL,
            right: NIL,
        }
    }
}

/// Unbalanced BST holding every key that hashed to one slot.
///
/// Nodes live in an arena and link to each other by index; `NIL` is the
/// empty link. Slots of removed nodes are recycled through `free_list`.
pub(crate) struct Bucket<K> {
    root: u32,
    len: usize,
    arena: Vec<Option<Node<K>>>,
    free_list: Vec<u32>,
}

impl<K> Bucket<K> {
    pub(crate) fn new() -> Self {
        Bucket {
            root: NIL,
            len: 0,
            arena: Vec::new(),
            free_list: Vec::new(),
        }
    }

    #[inline(always)]
    fn node(&self, idx: u32) -> &Node<K> {
        match &self.arena[idx as usize] {
            Some(node) => node,
            None => unreachable!("link to vacant arena slot {idx}"),
        }
    }

    #[inline(always)]
    fn node_mut(&mut self, idx: u32) -> &mut Node<K> {
        match &mut self.arena[idx as usize] {
            Some(node) => node,
            None => unreachable!("link to vacant arena slot {idx}"),
        }
    }

    #[inline(always)]
    fn alloc(&mut self, node: Node<K>) -> u32 {
        if let Some(idx) = self.free_list.pop() {
            self.arena[idx as usize] = Some(node);
            idx
        } else {
            let idx = self.arena.len() as u32;
            assert!(idx != NIL, "bucket arena exhausted");
            self.arena.push(Some(node));
            idx
        }
    }

    #[inline(always)]
    fn release(&mut self, idx: u32) -> K {
        let Some(node) = self.arena[idx as usize].take() else {
            unreachable!("double release of arena slot {idx}");
        };
        self.free_list.push(idx);
        node.key
    }

    pub(crate) fn insert<S>(&mut self, key: &K, strategy: &S) -> Outcome
    where
        S: KeyStrategy<Key = K>,
    {
        let mut parent = NIL;
        let mut dir = Ordering::Equal;
        let mut curr = self.root;
        let mut depth = 0u32;

        while curr != NIL {
            let node = self.node(curr);
            dir = strategy.compare(key, &node.key);
            parent = curr;
            curr = match dir {
                Ordering::Equal => return Outcome::AlreadyStored,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            depth += 1;
        }

        let idx = self.alloc(Node::new(strategy.clone_key(key), depth));
        if parent == NIL {
            self.root = idx;
        } else if dir == Ordering::Less {
            self.node_mut(parent).left = idx;
        } else {
            self.node_mut(parent).right = idx;
        }
        self.len += 1;
        Outcome::Success
    }

    /// Moves the subtree rooted at `idx` one level closer to the root.
    fn lift(&mut self, idx: u32) {
        if idx == NIL {
            return;
        }
        let mut stack = vec![idx];
        while let Some(curr) = stack.pop() {
            let node = self.node_mut(curr);
            node.level -= 1;
            if node.left != NIL {
                stack.push(node.left);
            }
            if node.right != NIL {
                stack.push(node.right);
            }
        }
    }

    /// Removes `key`, repairing cached levels only in the subtree that moves.
    pub(crate) fn remove<S>(&mut self, key: &K, strategy: &S) -> Outcome
    where
        S: KeyStrategy<Key = K>,
    {
        let mut target = self.root;
        let mut target_parent = NIL;
        while target != NIL {
            let node = self.node(target);
            let next = match strategy.compare(key, &node.key) {
                Ordering::Equal => break,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            target_parent = target;
            target = next;
        }
        if target == NIL {
            return Outcome::NotStored;
        }

        let (t_left, t_right, t_level) = {
            let t = self.node(target);
            (t.left, t.right, t.level)
        };

        let replacement = if t_left == NIL {
            self.lift(t_right);
            t_right
        } else if t_right == NIL {
            self.lift(t_left);
            t_left
        } else {
            // in-order successor: leftmost node of the right subtree
            let mut rep = t_right;
            let mut rep_parent = target;
            while self.node(rep).left != NIL {
                rep_parent = rep;
                rep = self.node(rep).left;
            }
            let rep_right = self.node(rep).right;
            self.lift(rep_right);
            if rep_parent != target {
                self.node_mut(rep_parent).left = rep_right;
                self.node_mut(rep).right = t_right;
            }
            let r = self.node_mut(rep);
            r.left = t_left;
            r.level = t_level;
            rep
        };

        if target_parent == NIL {
            self.root = replacement;
        } else {
            let p = self.node_mut(target_parent);
            if p.left == target {
                p.left = replacement;
            } else {
                p.right = replacement;
            }
        }

        let old = self.release(target);
        strategy.destroy(old);
        self.len -= 1;
        Outcome::Success
    }

    /// In-order `level-key` entries, comma separated.
    pub(crate) fn fmt_entries<S>(&self, strategy: &S, out: &mut dyn fmt::Write) -> fmt::Result
    where
        S: KeyStrategy<Key = K>,
    {
        let mut stack = Vec::new();
        let mut curr = self.root;
        let mut first = true;
        loop {
            while curr != NIL {
                stack.push(curr);
                curr = self.node(curr).left;
            }
            let Some(idx) = stack.pop() else {
                return Ok(());
            };
            let node = self.node(idx);
            if first {
                first = false;
            } else {
                out.write_char(',')?;
            }
            write!(out, "{}-", node.level)?;
            strategy.print(&node.key, out)?;
            curr = node.right;
        }
    }

    /// Post-order teardown handing every key to `strategy.destroy`.
    pub(crate) fn destroy<S>(mut self, strategy: &S) -> usize
    where
        S: KeyStrategy<Key = K>,
    {
        // reversed (self, right, left) preorder is (left, right, self) postorder
        let mut order = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        if self.root != NIL {
            stack.push(self.root);
        }
        while let Some(idx) = stack.pop() {
            order.push(idx);
            let node = self.node(idx);
            if node.left != NIL {
                stack.push(node.left);
            }
            if node.right != NIL {
                stack.push(node.right);
            }
        }
        for &idx in order.iter().rev() {
            let key = self.release(idx);
            strategy.destroy(key);
        }
        self.root = NIL;
        self.len = 0;
        order.len()
    }

    /// Recomputes every depth from the root and checks it against the cached
    /// level, along with the search-tree ordering. Returns the node count.
    #[cfg(test)]
    pub(crate) fn validate<S>(&self, strategy: &S) -> usize
    where
        S: KeyStrategy<Key = K>,
    {
        let mut count = 0;
        let mut stack = Vec::new();
        if self.root != NIL {
            stack.push((self.root, 0u32, None::<&K>, None::<&K>));
        }
        while let Some((idx, depth, lo, hi)) = stack.pop() {
            let node = self.node(idx);
            assert_eq!(node.level, depth, "cached level drifted at arena slot {idx}");
            if let Some(lo) = lo {
                assert_eq!(strategy.compare(lo, &node.key), Ordering::Less);
            }
            if let Some(hi) = hi {
                assert_eq!(strategy.compare(&node.key, hi), Ordering::Less);
            }
            count += 1;
            if node.left != NIL {
                stack.push((node.left, depth + 1, lo, Some(&node.key)));
            }
            if node.right != NIL {
                stack.push((node.right, depth + 1, Some(&node.key), hi));
            }
        }
        assert_eq!(count, self.len);
        assert_eq!(
            self.arena.iter().filter(|slot| slot.is_some()).count(),
            self.len,
            "unreachable nodes left in the arena"
        );
        count
    }

    #[cfg(test)]
    pub(crate) fn arena_len(&self) -> usize {
        self.arena.len()
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> Vec<(u32, &K)> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut curr = self.root;
        loop {
            while curr != NIL {
                stack.push(curr);
                curr = self.node(curr).left;
            }
            let Some(idx) = stack.pop() else {
                return out;
            };
            let node = self.node(idx);
            out.push((node.level, &node.key));
            curr = node.right;
        }
    }
}
