use geo::{Coord, LineString};

/// Stitches directed two-point segments into polylines.
///
/// A segment extends the current polyline only when its start equals, exactly, the last point
/// of that polyline. Only the immediately preceding segment is considered; no search for a
/// better predecessor is made, so chains must arrive in order to be joined.
#[derive(Debug, Default, Clone)]
pub struct PolylineMerger {
    completed: Vec<LineString>,
    current: Vec<Coord>,
}

impl PolylineMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, start: Coord, end: Coord) {
        if self.current.last() == Some(&start) {
            self.current.push(end);
            return;
        }
        self.flush();
        self.current = vec![start, end];
    }

    fn flush(&mut self) {
        let points = std::mem::take(&mut self.current);
        if points.len() >= 2 {
            self.completed.push(LineString::new(points));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.current.is_empty()
    }

    /// Emit all polylines, each with at least two points, in input order.
    pub fn finish(mut self) -> Vec<LineString> {
        self.flush();
        self.completed
    }
}

pub fn merge_segments<I>(segments: I) -> Vec<LineString>
where
    I: IntoIterator<Item = (Coord, Coord)>,
{
    let mut merger = PolylineMerger::new();
    for (start, end) in segments {
        merger.push(start, end);
    }
    merger.finish()
}
