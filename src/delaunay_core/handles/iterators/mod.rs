//! Iterators over mesh elements.
mod circular_iterator;

use slotmap::basic::Keys;

use super::*;
use crate::delaunay_core::dcel::{Dcel, EdgeEntry, FaceEntry, SegmentEntry, ShapeEntry, VertexEntry};

pub use circular_iterator::{CcwEdgeFn, CircularIterator, NextBackFn};

macro_rules! dynamic_handle_iterator {
    ($(#[$meta:meta])* $name:ident, $store:ident, $key:ty, $entry:ty, $item:ident) => {
        $(#[$meta])*
        pub struct $name<'a> {
            dcel: &'a Dcel,
            keys: Keys<'a, $key, $entry>,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(dcel: &'a Dcel) -> Self {
                $name {
                    dcel,
                    keys: dcel.$store.keys(),
                }
            }
        }

        impl<'a> Iterator for $name<'a> {
            type Item = $item<'a>;

            fn next(&mut self) -> Option<Self::Item> {
                let dcel = self.dcel;
                self.keys.next().map(|key| DynamicHandleImpl::new(dcel, key))
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.keys.size_hint()
            }
        }
    };
}

macro_rules! fixed_handle_iterator {
    ($(#[$meta:meta])* $name:ident, $store:ident, $key:ty, $entry:ty) => {
        $(#[$meta])*
        pub struct $name<'a> {
            keys: Keys<'a, $key, $entry>,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(dcel: &'a Dcel) -> Self {
                $name {
                    keys: dcel.$store.keys(),
                }
            }
        }

        impl<'a> Iterator for $name<'a> {
            type Item = $key;

            fn next(&mut self) -> Option<Self::Item> {
                self.keys.next()
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.keys.size_hint()
            }
        }
    };
}

dynamic_handle_iterator!(
    /// An iterator over all vertices, created by [Mesh::vertices](crate::Mesh::vertices).
    VertexIterator,
    vertices,
    FixedVertexHandle,
    VertexEntry,
    VertexHandle
);

dynamic_handle_iterator!(
    /// An iterator over all undirected edges, created by
    /// [Mesh::undirected_edges](crate::Mesh::undirected_edges).
    UndirectedEdgeIterator,
    edges,
    FixedUndirectedEdgeHandle,
    EdgeEntry,
    UndirectedEdgeHandle
);

dynamic_handle_iterator!(
    /// An iterator over all faces, created by [Mesh::faces](crate::Mesh::faces).
    FaceIterator,
    faces,
    FixedFaceHandle,
    FaceEntry,
    FaceHandle
);

fixed_handle_iterator!(
    /// An iterator over all constraint segments.
    FixedSegmentIterator,
    segments,
    FixedSegmentHandle,
    SegmentEntry
);

fixed_handle_iterator!(
    /// An iterator over all constraint shapes.
    FixedShapeIterator,
    shapes,
    FixedShapeHandle,
    ShapeEntry
);

/// An iterator over all directed edges, created by
/// [Mesh::directed_edges](crate::Mesh::directed_edges).
///
/// Both directions of an edge are returned one after another.
pub struct DirectedEdgeIterator<'a> {
    undirected: UndirectedEdgeIterator<'a>,
    pending: Option<DirectedEdgeHandle<'a>>,
}

impl<'a> DirectedEdgeIterator<'a> {
    pub(crate) fn new(dcel: &'a Dcel) -> Self {
        DirectedEdgeIterator {
            undirected: UndirectedEdgeIterator::new(dcel),
            pending: None,
        }
    }
}

impl<'a> Iterator for DirectedEdgeIterator<'a> {
    type Item = DirectedEdgeHandle<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(pending) = self.pending.take() {
            return Some(pending);
        }
        let edge = self.undirected.next()?.as_directed();
        self.pending = Some(edge.rev());
        Some(edge)
    }
}
