//! Marching-squares boundary tracing at the 0.5 iso-level.
//!
//! Every vertex sits on the midpoint of a grid edge joining a `true` and a
//! `false` sample. Segments are directed so that `true` samples lie on their
//! left when `x = col` and `y = row`, which gives outer boundaries a positive
//! shoelace area and holes a negative one. Saddle cells are split so that
//! diagonal `true` samples stay apart (the foreground is 4-connected, the
//! background 8-connected).

use std::collections::HashMap;

use crate::mask::InstanceMask;

/// A closed boundary in padded `(row, col)` coordinates; the last point
/// repeats the first.
pub type Contour = Vec<[f64; 2]>;

/// Grid point in doubled `(row, col)` coordinates, so edge midpoints are
/// integral.
type Key = (usize, usize);

#[derive(Clone, Copy, Debug)]
struct Segment {
    from: Key,
    to: Key,
}

/// Traces every closed boundary of `mask`.
///
/// Contours are returned in scan order of their first segment (row-major
/// over grid cells), so the output is deterministic.
pub fn find_contours(mask: &InstanceMask) -> Vec<Contour> {
    let rows = mask.padded_rows();
    let cols = mask.padded_cols();

    let mut segments = Vec::new();
    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            cell_segments(mask, r, c, &mut segments);
        }
    }

    assemble(&segments)
}

/// Emits the directed segments of the cell whose top-left sample is `(r, c)`.
fn cell_segments(mask: &InstanceMask, r: usize, c: usize, out: &mut Vec<Segment>) {
    // Corners clockwise from top-left; edge i joins corner i and corner i + 1.
    let corners: [Key; 4] = [
        (2 * r, 2 * c),
        (2 * r, 2 * c + 2),
        (2 * r + 2, 2 * c + 2),
        (2 * r + 2, 2 * c),
    ];
    let values = [
        mask.padded(r, c),
        mask.padded(r, c + 1),
        mask.padded(r + 1, c + 1),
        mask.padded(r + 1, c),
    ];
    let edges: [Key; 4] = [
        (2 * r, 2 * c + 1),
        (2 * r + 1, 2 * c + 2),
        (2 * r + 2, 2 * c + 1),
        (2 * r + 1, 2 * c),
    ];

    let crossing: Vec<usize> = (0..4).filter(|&i| values[i] != values[(i + 1) % 4]).collect();

    match crossing.len() {
        2 => {
            let inside = (0..4).find(|&i| values[i]).map(|i| corners[i]);
            if let Some(inside) = inside {
                out.push(directed(edges[crossing[0]], edges[crossing[1]], inside));
            }
        }
        4 => {
            // Saddle: cut off each true corner on its own.
            for k in (0..4).filter(|&k| values[k]) {
                out.push(directed(edges[(k + 3) % 4], edges[k], corners[k]));
            }
        }
        _ => {}
    }
}

/// Orders `a`–`b` so that `inside` is on the left of travel.
fn directed(a: Key, b: Key, inside: Key) -> Segment {
    let (ay, ax) = (a.0 as i64, a.1 as i64);
    let (dy, dx) = (b.0 as i64 - ay, b.1 as i64 - ax);
    let (ky, kx) = (inside.0 as i64 - ay, inside.1 as i64 - ax);

    if dx * ky - dy * kx > 0 {
        Segment { from: a, to: b }
    } else {
        Segment { from: b, to: a }
    }
}

/// Chains directed segments into closed rings.
fn assemble(segments: &[Segment]) -> Vec<Contour> {
    let starts: HashMap<Key, usize> = segments
        .iter()
        .enumerate()
        .map(|(i, s)| (s.from, i))
        .collect();

    let mut visited = vec![false; segments.len()];
    let mut contours = Vec::new();

    for first in 0..segments.len() {
        if visited[first] {
            continue;
        }

        let mut ring = Vec::new();
        let mut current = first;
        loop {
            visited[current] = true;
            ring.push(to_point(segments[current].from));

            match starts.get(&segments[current].to) {
                Some(&next) if next == first => break,
                Some(&next) if !visited[next] => current = next,
                // Open chain; cannot happen on a padded mask.
                _ => break,
            }
        }

        ring.push(ring[0]);
        contours.push(ring);
    }

    contours
}

#[inline]
fn to_point(key: Key) -> [f64; 2] {
    [key.0 as f64 / 2.0, key.1 as f64 / 2.0]
}
