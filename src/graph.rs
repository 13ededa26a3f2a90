//! Directed graph of todos.
//!
//! An edge stored at vertex `a` pointing at vertex `b` means "`a` depends on `b`".
//! The degree of a vertex counts the dependencies it still waits on, so a vertex with
//! degree zero can be done right away.
//!
//! Vertices are kept in a singly linked list in insertion order. The links are arena
//! indices, which lets both sorts relink the list in place without allocating.

use tracing::debug;

use crate::arena::{Arena, Index};
use crate::error::ContainerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    target: Index,
    target_id: u32,
}

impl Edge {
    pub fn target_id(&self) -> u32 {
        self.target_id
    }
}

#[derive(Debug, Clone)]
pub struct Vertex<T> {
    id: u32,
    data: T,
    edges: Vec<Edge>,
    /// Number of edges in `edges`, i.e. unmet dependencies.
    degree: usize,
    /// Number of edges elsewhere in the graph that target this vertex.
    dependents: usize,
    next: Option<Index>,
}

impl<T> Vertex<T> {
    fn new(id: u32, data: T) -> Self {
        Self {
            id,
            data,
            edges: Vec::new(),
            degree: 0,
            dependents: 0,
            next: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn dependents(&self) -> usize {
        self.dependents
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether this vertex already depends on `target_id`.
    pub fn search_edge_by_id(&self, target_id: u32) -> bool {
        self.edges.iter().any(|edge| edge.target_id == target_id)
    }
}

#[derive(Debug, Clone)]
pub struct DirectedGraph<T> {
    vertices: Arena<Vertex<T>>,
    head: Option<Index>,
    tail: Option<Index>,
}

impl<T> DirectedGraph<T> {
    pub fn new() -> Self {
        Self {
            vertices: Arena::new(),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in list order.
    pub fn iter(&self) -> Vertices<'_, T> {
        Vertices {
            vertices: &self.vertices,
            current: self.head,
        }
    }

    fn index_of(&self, id: u32) -> Option<Index> {
        let mut current = self.head;
        while let Some(index) = current {
            let vertex = &self.vertices[index];
            if vertex.id == id {
                return Some(index);
            }
            current = vertex.next;
        }
        None
    }

    pub fn search_by_id(&self, id: u32) -> Option<&Vertex<T>> {
        self.index_of(id).map(|index| &self.vertices[index])
    }

    /// Appends a vertex to the tail of the list.
    pub fn add_vertex(&mut self, id: u32, data: T) -> Result<(), ContainerError> {
        if self.index_of(id).is_some() {
            return Err(ContainerError::DuplicateKey { id });
        }

        let index = self.vertices.insert(Vertex::new(id, data));
        match self.tail {
            Some(tail) => self.vertices[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        Ok(())
    }

    /// Records that `from_id` depends on `to_id`.
    ///
    /// Duplicate and cyclic edges are not checked for; callers scan the edge list first
    /// when they care.
    pub fn add_edge_by_id(&mut self, from_id: u32, to_id: u32) -> Result<(), ContainerError> {
        if from_id == to_id {
            return Err(ContainerError::SelfLoop { id: from_id });
        }
        let from = self
            .index_of(from_id)
            .ok_or(ContainerError::VertexNotFound { id: from_id })?;
        let to = self
            .index_of(to_id)
            .ok_or(ContainerError::VertexNotFound { id: to_id })?;

        let source = &mut self.vertices[from];
        source.edges.push(Edge {
            target: to,
            target_id: to_id,
        });
        source.degree += 1;
        self.vertices[to].dependents += 1;
        Ok(())
    }

    /// Vertices that `id` depends on, in the order the edges were added.
    pub fn dependencies_of(&self, id: u32) -> Option<impl Iterator<Item = &Vertex<T>> + '_> {
        let vertex = self.search_by_id(id)?;
        Some(
            vertex
                .edges
                .iter()
                .filter_map(|edge| self.vertices.get(edge.target)),
        )
    }

    /// Removes the vertex and every edge pointing at it.
    pub fn delete_vertex_by_id(&mut self, id: u32) -> Option<T> {
        let mut previous = None;
        let mut current = self.head;
        while let Some(index) = current {
            if self.vertices[index].id == id {
                break;
            }
            previous = current;
            current = self.vertices[index].next;
        }
        let index = current?;

        let next = self.vertices[index].next;
        match previous {
            Some(previous) => self.vertices[previous].next = next,
            None => self.head = next,
        }
        if self.tail == Some(index) {
            self.tail = previous;
        }

        let removed = self.vertices.remove(index)?;
        for edge in &removed.edges {
            if let Some(target) = self.vertices.get_mut(edge.target) {
                target.dependents -= 1;
            }
        }

        let mut purged = 0;
        for (_, vertex) in self.vertices.iter_mut() {
            let before = vertex.edges.len();
            vertex.edges.retain(|edge| edge.target != index);
            let dropped = before - vertex.edges.len();
            vertex.degree -= dropped;
            purged += dropped;
        }

        debug!(id, purged, "vertex deleted");
        Some(removed.data)
    }

    /// Sorts the list by ascending id.
    pub fn insertion_sort_by_id(&mut self) {
        self.insertion_sort_by_key(|vertex| vertex.id as usize);
    }

    /// Sorts the list by ascending degree. Vertices with the same degree keep their order.
    pub fn insertion_sort_by_degree_ascending(&mut self) {
        self.insertion_sort_by_key(|vertex| vertex.degree);
    }

    /// Vertices with no unmet dependency, most doable first.
    ///
    /// Sorts the list by degree and stops at the first vertex that still waits on something.
    pub fn what_to_do(&mut self) -> impl Iterator<Item = &Vertex<T>> + '_ {
        self.insertion_sort_by_degree_ascending();
        self.iter().take_while(|vertex| vertex.degree == 0)
    }

    // Stable: a node is inserted after every sorted node whose key is not greater.
    fn insertion_sort_by_key(&mut self, key: fn(&Vertex<T>) -> usize) {
        let mut sorted_head: Option<Index> = None;
        let mut sorted_tail: Option<Index> = None;
        let mut current = self.head;

        while let Some(index) = current {
            current = self.vertices[index].next;
            let value = key(&self.vertices[index]);

            match sorted_head {
                Some(head) if key(&self.vertices[head]) <= value => {
                    let mut cursor = head;
                    while let Some(next) = self.vertices[cursor].next {
                        if key(&self.vertices[next]) > value {
                            break;
                        }
                        cursor = next;
                    }
                    self.vertices[index].next = self.vertices[cursor].next;
                    self.vertices[cursor].next = Some(index);
                    if self.vertices[index].next.is_none() {
                        sorted_tail = Some(index);
                    }
                }
                _ => {
                    self.vertices[index].next = sorted_head;
                    if sorted_head.is_none() {
                        sorted_tail = Some(index);
                    }
                    sorted_head = Some(index);
                }
            }
        }

        self.head = sorted_head;
        self.tail = sorted_tail;
    }
}

impl<T> Default for DirectedGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Vertices<'a, T> {
    vertices: &'a Arena<Vertex<T>>,
    current: Option<Index>,
}

impl<'a, T> Iterator for Vertices<'a, T> {
    type Item = &'a Vertex<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let vertex = self.vertices.get(self.current?)?;
        self.current = vertex.next;
        Some(vertex)
    }
}
