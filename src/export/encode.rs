//! Serializing arcs to coordinate arrays.

use crate::ir::{ArcPool, Point};

/// How vertices are written out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcEncoding {
    /// Every vertex as-is.
    Absolute,
    /// First vertex as-is, then each vertex minus the one before it.
    Delta,
}

impl ArcEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            ArcEncoding::Absolute => "absolute",
            ArcEncoding::Delta => "delta",
        }
    }
}

/// Encodes one arc. Arcs with fewer than two vertices encode as `None`.
pub fn encode_arc<I>(points: I, encoding: ArcEncoding) -> Option<Vec<[f64; 2]>>
where
    I: IntoIterator<Item = Point>,
{
    let mut out = Vec::new();
    let mut prev = Point::new(0.0, 0.0);
    for p in points {
        match encoding {
            ArcEncoding::Absolute => out.push([p.x, p.y]),
            ArcEncoding::Delta => {
                out.push([p.x - prev.x, p.y - prev.y]);
                prev = p;
            }
        }
    }
    if out.len() > 1 {
        Some(out)
    } else {
        None
    }
}

/// Encodes every arc in the pool, in pool order.
pub fn encode_arcs<P: ArcPool>(pool: &P, encoding: ArcEncoding) -> Vec<Option<Vec<[f64; 2]>>> {
    (0..pool.arc_count())
        .map(|i| encode_arc(pool.arc_points(i), encoding))
        .collect()
}

/// Reverses delta encoding by accumulating offsets from the first pair.
pub fn decode_delta_arc(arc: &[[f64; 2]]) -> Vec<Point> {
    let mut x = 0.0;
    let mut y = 0.0;
    arc.iter()
        .map(|&[dx, dy]| {
            x += dx;
            y += dy;
            Point::new(x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ArcCollection;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_delta_encoding() {
        let arc = pts(&[(10.0, 20.0), (12.0, 25.0), (12.0, 19.0)]);
        assert_eq!(
            encode_arc(arc, ArcEncoding::Delta),
            Some(vec![[10.0, 20.0], [2.0, 5.0], [0.0, -6.0]])
        );
    }

    #[test]
    fn test_absolute_encoding() {
        let arc = pts(&[(10.0, 20.0), (12.0, 25.0)]);
        assert_eq!(
            encode_arc(arc, ArcEncoding::Absolute),
            Some(vec![[10.0, 20.0], [12.0, 25.0]])
        );
    }

    #[test]
    fn test_short_arcs_are_null() {
        assert_eq!(encode_arc(pts(&[(1.0, 2.0)]), ArcEncoding::Delta), None);
        assert_eq!(encode_arc(Vec::new(), ArcEncoding::Absolute), None);
    }

    #[test]
    fn test_encode_arcs_keeps_alignment() {
        let arcs = ArcCollection::from_arcs(vec![
            pts(&[(0.0, 0.0), (1.0, 1.0)]),
            pts(&[(3.0, 3.0)]),
            pts(&[(1.0, 1.0), (2.0, 0.0)]),
        ]);
        let out = encode_arcs(&arcs, ArcEncoding::Delta);
        assert_eq!(
            out,
            vec![
                Some(vec![[0.0, 0.0], [1.0, 1.0]]),
                None,
                Some(vec![[1.0, 1.0], [1.0, -1.0]]),
            ]
        );
    }

    #[test]
    fn test_decode_reverses_encode() {
        let arc = pts(&[(10.0, 20.0), (12.0, 25.0), (12.0, 19.0), (-4.0, 0.0)]);
        let encoded = encode_arc(arc.clone(), ArcEncoding::Delta).unwrap();
        assert_eq!(decode_delta_arc(&encoded), arc);
    }
}
