use core::marker::PhantomData;

use super::super::DirectedEdgeHandle;

pub trait NextBackFn {
    fn next(edge_handle: DirectedEdgeHandle) -> DirectedEdgeHandle;

    fn next_back(edge_handle: DirectedEdgeHandle) -> DirectedEdgeHandle;
}

/// Rotates counterclockwise around an edge's origin.
pub struct CcwEdgeFn;

impl NextBackFn for CcwEdgeFn {
    fn next(edge_handle: DirectedEdgeHandle) -> DirectedEdgeHandle {
        edge_handle.ccw()
    }

    fn next_back(edge_handle: DirectedEdgeHandle) -> DirectedEdgeHandle {
        edge_handle.cw()
    }
}

/// Walks around a cycle of edges until it reaches its starting edge again.
pub struct CircularIterator<'a, NB> {
    current_handle: DirectedEdgeHandle<'a>,
    final_handle: DirectedEdgeHandle<'a>,
    iteration_finished: bool,
    next_back_fn: PhantomData<NB>,
}

impl<'a, NB: NextBackFn> CircularIterator<'a, NB> {
    pub fn new(start_edge: DirectedEdgeHandle<'a>) -> Self {
        CircularIterator {
            current_handle: start_edge,
            final_handle: start_edge,
            iteration_finished: false,
            next_back_fn: Default::default(),
        }
    }
}

impl<'a, NB: NextBackFn> Iterator for CircularIterator<'a, NB> {
    type Item = DirectedEdgeHandle<'a>;

    fn next(&mut self) -> Option<DirectedEdgeHandle<'a>> {
        if self.iteration_finished {
            return None;
        }
        let result = self.current_handle;
        self.current_handle = NB::next(self.current_handle);
        if self.current_handle == self.final_handle {
            self.iteration_finished = true;
        }
        Some(result)
    }
}

impl<'a, NB: NextBackFn> DoubleEndedIterator for CircularIterator<'a, NB> {
    fn next_back(&mut self) -> Option<DirectedEdgeHandle<'a>> {
        if self.iteration_finished {
            return None;
        }
        self.final_handle = NB::next_back(self.final_handle);
        if self.current_handle == self.final_handle {
            self.iteration_finished = true;
        }
        Some(self.final_handle)
    }
}
