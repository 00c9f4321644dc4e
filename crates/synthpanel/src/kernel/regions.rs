use kurbo::{Line, Point, Rect};
use std::collections::HashSet;
use std::f64::consts::TAU;

use crate::geometry::region::loop_area;
use crate::geometry::{points_coincide, segment_parameter, Region, SketchCurve, TOLERANCE};

const ANGLE_EPSILON: f64 = 1e-9;

/// Grid used to make face ordering insensitive to rounding noise.
const ORDER_QUANTUM: f64 = 1e-6;

/// A traced face: half-edge cycles plus the region they bound.
#[derive(Debug, Clone)]
pub(crate) struct Face {
    pub outer: Vec<usize>,
    pub holes: Vec<Vec<usize>>,
    pub region: Region,
}

/// Sketch curves split at T-junctions and snapped within [`TOLERANCE`],
/// with faces traced by always taking the sharpest left turn. Clockwise
/// cycles bound connected components and become holes of the smallest face
/// that contains them. Arcs are never split.
#[derive(Debug, Clone)]
pub(crate) struct Arrangement {
    vertices: Vec<Point>,
    /// Edge `e` runs from `ends[e].0` to `ends[e].1`.
    edges: Vec<SketchCurve>,
    ends: Vec<(usize, usize)>,
    /// Outgoing half-edges per vertex.
    outgoing: Vec<Vec<usize>>,
    faces: Vec<Face>,
}

impl Arrangement {
    pub fn build(curves: &[SketchCurve]) -> Self {
        let mut arrangement = Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            ends: Vec::new(),
            outgoing: Vec::new(),
            faces: Vec::new(),
        };

        for piece in split_at_junctions(curves) {
            if piece.is_degenerate() {
                continue;
            }
            let from = arrangement.vertex(piece.start());
            let to = arrangement.vertex(piece.end());
            let e = arrangement.edges.len();
            arrangement.edges.push(piece);
            arrangement.ends.push((from, to));
            arrangement.outgoing[from].push(2 * e);
            arrangement.outgoing[to].push(2 * e + 1);
        }

        arrangement.faces = arrangement.trace_faces();
        arrangement
    }

    /// Faces ordered top to bottom, then left to right, then largest first.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Boundary loops of the union of the selected faces.
    ///
    /// Collinear consecutive lines are merged and every loop starts at its
    /// lowest, then leftmost, vertex. Outer loops run counterclockwise and
    /// holes clockwise.
    pub fn boundary_loops(&self, selected: &[usize]) -> Vec<Vec<SketchCurve>> {
        let inside: HashSet<usize> = selected
            .iter()
            .filter_map(|&i| self.faces.get(i))
            .flat_map(|face| face.outer.iter().chain(face.holes.iter().flatten()))
            .copied()
            .collect();
        let boundary: HashSet<usize> = inside
            .iter()
            .copied()
            .filter(|h| !inside.contains(&(h ^ 1)))
            .collect();

        let mut sorted: Vec<usize> = boundary.iter().copied().collect();
        sorted.sort_unstable();
        let cycles = self.trace_cycles(&sorted, |h| boundary.contains(&h));

        cycles
            .into_iter()
            .map(|cycle| {
                let curves: Vec<SketchCurve> = cycle.iter().map(|&h| self.curve(h)).collect();
                start_at_lowest(merge_collinear(curves))
            })
            .collect()
    }

    fn vertex(&mut self, p: Point) -> usize {
        if let Some(i) = self.vertices.iter().position(|v| points_coincide(*v, p)) {
            return i;
        }
        self.vertices.push(p);
        self.outgoing.push(Vec::new());
        self.vertices.len() - 1
    }

    fn curve(&self, h: usize) -> SketchCurve {
        let edge = self.edges[h / 2];
        if h % 2 == 0 {
            edge
        } else {
            edge.reversed()
        }
    }

    fn origin(&self, h: usize) -> usize {
        let (from, to) = self.ends[h / 2];
        if h % 2 == 0 {
            from
        } else {
            to
        }
    }

    fn angle(&self, h: usize) -> f64 {
        self.curve(h).start_tangent().atan2()
    }

    /// The half-edge leaving the end of `h` with the smallest clockwise turn
    /// from the reversed direction of `h`, among those accepted by `allowed`.
    fn next(&self, h: usize, allowed: &impl Fn(usize) -> bool) -> Option<usize> {
        let twin = h ^ 1;
        let v = self.origin(twin);
        let back = self.angle(twin);
        self.outgoing[v]
            .iter()
            .copied()
            .filter(|&candidate| allowed(candidate))
            .map(|candidate| {
                let mut gap = (back - self.angle(candidate)).rem_euclid(TAU);
                if gap < ANGLE_EPSILON {
                    gap = TAU;
                }
                (candidate, gap)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate)
    }

    fn trace_cycles(&self, starts: &[usize], allowed: impl Fn(usize) -> bool) -> Vec<Vec<usize>> {
        let mut visited = HashSet::new();
        let mut cycles = Vec::new();
        let limit = 2 * self.edges.len() + 1;

        for &start in starts {
            if visited.contains(&start) {
                continue;
            }
            let mut cycle = vec![start];
            visited.insert(start);
            let mut h = start;
            let mut closed = false;
            while cycle.len() <= limit {
                let Some(n) = self.next(h, &allowed) else {
                    break;
                };
                if n == start {
                    closed = true;
                    break;
                }
                if !visited.insert(n) {
                    break;
                }
                cycle.push(n);
                h = n;
            }
            if closed {
                cycles.push(cycle);
            }
        }
        cycles
    }

    fn trace_faces(&self) -> Vec<Face> {
        let all: Vec<usize> = (0..2 * self.edges.len()).collect();
        let cycles = self.trace_cycles(&all, |_| true);
        let components = self.components();

        let mut faces = Vec::new();
        let mut face_components = Vec::new();
        let mut boundaries = Vec::new();
        for cycle in cycles {
            let curves: Vec<SketchCurve> = cycle.iter().map(|&h| self.curve(h)).collect();
            let area = loop_area(&curves);
            let component = components[self.origin(cycle[0])];
            if area > TOLERANCE * TOLERANCE {
                faces.push((cycle, curves));
                face_components.push(component);
            } else if area < -TOLERANCE * TOLERANCE {
                boundaries.push((cycle, component));
            }
        }

        let outer_regions: Vec<Region> = faces
            .iter()
            .map(|(_, curves)| Region::from_loops(curves, &[]))
            .collect();
        let mut holes: Vec<Vec<Vec<usize>>> = vec![Vec::new(); faces.len()];
        for (cycle, component) in boundaries {
            let sample = self.vertices[self.origin(cycle[0])];
            let host = (0..faces.len())
                .filter(|&f| face_components[f] != component && outer_regions[f].contains(sample))
                .min_by(|&a, &b| outer_regions[a].area().total_cmp(&outer_regions[b].area()));
            if let Some(f) = host {
                holes[f].push(cycle);
            }
        }

        let mut result: Vec<Face> = faces
            .into_iter()
            .zip(holes)
            .map(|((outer, curves), holes)| {
                let hole_curves: Vec<Vec<SketchCurve>> = holes
                    .iter()
                    .map(|cycle| cycle.iter().map(|&h| self.curve(h)).collect())
                    .collect();
                let region = Region::from_loops(&curves, &hole_curves);
                Face {
                    outer,
                    holes,
                    region,
                }
            })
            .collect();
        result.sort_by_key(|face| order_key(face.region.bounds(), face.region.area()));
        result
    }

    /// Connected component label per vertex.
    fn components(&self) -> Vec<usize> {
        let mut parent: Vec<usize> = (0..self.vertices.len()).collect();
        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }
        for &(a, b) in &self.ends {
            let ra = find(&mut parent, a);
            let rb = find(&mut parent, b);
            if ra != rb {
                parent[ra] = rb;
            }
        }
        (0..self.vertices.len())
            .map(|i| find(&mut parent, i))
            .collect()
    }
}

fn order_key(bounds: Rect, area: f64) -> (i64, i64, i64) {
    let q = |v: f64| (v / ORDER_QUANTUM).round() as i64;
    (q(-bounds.y1), q(bounds.x0), q(-area))
}

/// Split every line at the endpoints of other curves that land on its interior.
fn split_at_junctions(curves: &[SketchCurve]) -> Vec<SketchCurve> {
    let mut pieces = Vec::new();
    for (i, curve) in curves.iter().enumerate() {
        let SketchCurve::Line(line) = curve else {
            pieces.push(*curve);
            continue;
        };
        let slack = TOLERANCE / curve.length().max(TOLERANCE);
        let mut cuts: Vec<f64> = curves
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .flat_map(|(_, other)| [other.start(), other.end()])
            .filter_map(|p| segment_parameter(*line, p))
            .filter(|t| *t > slack && *t < 1.0 - slack)
            .collect();
        cuts.sort_by(f64::total_cmp);
        cuts.dedup_by(|a, b| (*a - *b).abs() <= slack);

        let mut from = line.p0;
        for t in cuts {
            let to = line.p0.lerp(line.p1, t);
            pieces.push(SketchCurve::Line(Line::new(from, to)));
            from = to;
        }
        pieces.push(SketchCurve::Line(Line::new(from, line.p1)));
    }
    pieces
}

fn same_direction(a: &SketchCurve, b: &SketchCurve) -> bool {
    match (a, b) {
        (SketchCurve::Line(_), SketchCurve::Line(_)) => {
            let (da, db) = (a.end_tangent(), b.start_tangent());
            da.cross(db).abs() < ANGLE_EPSILON && da.dot(db) > 0.0
        }
        _ => false,
    }
}

fn merge_collinear(curves: Vec<SketchCurve>) -> Vec<SketchCurve> {
    let n = curves.len();
    if n < 2 {
        return curves;
    }
    // Begin at a curve that cannot be merged into its predecessor.
    let first = (0..n)
        .find(|&i| !same_direction(&curves[(i + n - 1) % n], &curves[i]))
        .unwrap_or(0);

    let mut merged: Vec<SketchCurve> = Vec::with_capacity(n);
    for k in 0..n {
        let curve = curves[(first + k) % n];
        match merged.last_mut() {
            Some(last) if same_direction(last, &curve) => {
                *last = SketchCurve::Line(Line::new(last.start(), curve.end()));
            }
            _ => merged.push(curve),
        }
    }
    merged
}

fn start_at_lowest(mut curves: Vec<SketchCurve>) -> Vec<SketchCurve> {
    let q = |v: f64| (v / ORDER_QUANTUM).round() as i64;
    if let Some(lowest) = (0..curves.len()).min_by_key(|&i| {
        let p = curves[i].start();
        (q(p.y), q(p.x))
    }) {
        curves.rotate_left(lowest);
    }
    curves
}

/// Bounding box of a closed loop.
pub(crate) fn loop_bounds(curves: &[SketchCurve]) -> Rect {
    curves
        .iter()
        .map(SketchCurve::bounding_box)
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
}
