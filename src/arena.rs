//! A generational arena.
//!
//! Graph vertices and tree nodes refer to each other through [`Index`] values instead of
//! pointers. Removing a value bumps the generation of its slot, so an `Index` that outlived
//! its value never resolves to whatever reuses the slot later.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Index {
    slot: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Free { generation: u32, next_free: Option<usize> },
}

#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, value: T) -> Index {
        self.len += 1;

        match self.free_head {
            Some(slot) => {
                let generation = match self.slots[slot] {
                    Slot::Free {
                        generation,
                        next_free,
                    } => {
                        self.free_head = next_free;
                        generation
                    }
                    Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
                };
                self.slots[slot] = Slot::Occupied { generation, value };
                Index { slot, generation }
            }
            None => {
                self.slots.push(Slot::Occupied {
                    generation: 0,
                    value,
                });
                Index {
                    slot: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    pub fn get(&self, index: Index) -> Option<&T> {
        match self.slots.get(index.slot)? {
            Slot::Occupied { generation, value } if *generation == index.generation => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, index: Index) -> Option<&mut T> {
        match self.slots.get_mut(index.slot)? {
            Slot::Occupied { generation, value } if *generation == index.generation => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, index: Index) -> bool {
        self.get(index).is_some()
    }

    /// Removes the value at `index` and retires the index.
    pub fn remove(&mut self, index: Index) -> Option<T> {
        if !self.contains(index) {
            return None;
        }

        let retired = Slot::Free {
            generation: index.generation.wrapping_add(1),
            next_free: self.free_head,
        };
        let slot = std::mem::replace(&mut self.slots[index.slot], retired);
        self.free_head = Some(index.slot);
        self.len -= 1;

        match slot {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Free { .. } => None,
        }
    }

    /// Iterates over live values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| match entry {
                Slot::Occupied { generation, value } => Some((
                    Index {
                        slot,
                        generation: *generation,
                    },
                    value,
                )),
                Slot::Free { .. } => None,
            })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Index, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(slot, entry)| match entry {
                Slot::Occupied { generation, value } => Some((
                    Index {
                        slot,
                        generation: *generation,
                    },
                    value,
                )),
                Slot::Free { .. } => None,
            })
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<Index> for Arena<T> {
    type Output = T;

    fn index(&self, index: Index) -> &Self::Output {
        self.get(index).expect("stale arena index")
    }
}

impl<T> std::ops::IndexMut<Index> for Arena<T> {
    fn index_mut(&mut self, index: Index) -> &mut Self::Output {
        self.get_mut(index).expect("stale arena index")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty() {
        let arena = Arena::<u8>::new();
        assert!(arena.is_empty());
        assert_eq!(arena.iter().count(), 0);
    }

    #[test]
    fn insert_and_get() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn removed_index_is_stale() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.remove(a), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn reused_slot_does_not_resolve_old_index() {
        let mut arena = Arena::new();
        let old = arena.insert(1);
        arena.remove(old);

        let new = arena.insert(2);
        assert_eq!(arena.get(old), None);
        assert_eq!(arena.get(new), Some(&2));
        assert_ne!(old, new);
    }

    #[test]
    fn free_slots_are_reused_last_in_first_out() {
        let mut arena = Arena::new();
        let a = arena.insert('a');
        let b = arena.insert('b');
        arena.insert('c');
        arena.remove(a);
        arena.remove(b);

        arena.insert('d');
        arena.insert('e');
        let values: Vec<char> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!['e', 'd', 'c']);
    }

    #[test]
    #[should_panic]
    fn indexing_with_stale_index_panics() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        arena.remove(a);
        let _ = arena[a];
    }
}
