use geo_types::Polygon;

use crate::types::{Ring, DEFAULT_PRECISION, DEFAULT_TOLERANCE};

/// Smallest ring the drawing tool accepts: a triangle plus its closing point
pub const MIN_RING_POINTS: usize = 4;

/// Exterior-ring cleanup applied to every decomposed polygon.
///
/// The ring goes through two dedup/closure passes: one tolerance-based on the
/// raw coordinates, and one exact on the rounded coordinates, since rounding
/// can merge neighbours or break closure again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingNormalizer {
    pub precision: u32,
    pub tolerance: f64,
}

impl Default for RingNormalizer {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl RingNormalizer {
    pub fn new(precision: u32, tolerance: f64) -> Self {
        Self { precision, tolerance }
    }

    /// Normalize the exterior ring of a polygon; holes are ignored.
    ///
    /// Returns `None` when the polygon should be skipped.
    pub fn normalize_exterior(&self, polygon: &Polygon<f64>) -> Option<Ring> {
        let exterior: Ring = polygon.exterior().coords().map(|c| [c.x, c.y]).collect();
        self.normalize_ring(&exterior)
    }

    pub fn normalize_ring(&self, ring: &[[f64; 2]]) -> Option<Ring> {
        if ring.len() < MIN_RING_POINTS {
            return None;
        }

        let closed = self.close_within(self.dedup_within(ring));
        let rounded = self.round_ring(&closed);
        let fin = Self::close_exact(Self::dedup_exact(&rounded));

        (fin.len() >= MIN_RING_POINTS).then_some(fin)
    }

    /// Drop points within tolerance of the previously kept point
    pub fn dedup_within(&self, ring: &[[f64; 2]]) -> Ring {
        dedup_by(ring, |a, b| self.within(a, b))
    }

    /// Append the first point if the ends differ beyond tolerance
    pub fn close_within(&self, ring: Ring) -> Ring {
        close_by(ring, |a, b| self.within(a, b))
    }

    /// Round every component to the configured precision
    pub fn round_ring(&self, ring: &[[f64; 2]]) -> Ring {
        ring.iter()
            .map(|&[x, y]| {
                [
                    round_half_away_from_zero(x, self.precision),
                    round_half_away_from_zero(y, self.precision),
                ]
            })
            .collect()
    }

    /// Collapse runs of exactly equal points
    pub fn dedup_exact(ring: &[[f64; 2]]) -> Ring {
        dedup_by(ring, exactly_equal)
    }

    /// Append the first point if the ends are not exactly equal
    pub fn close_exact(ring: Ring) -> Ring {
        close_by(ring, exactly_equal)
    }

    fn within(&self, a: &[f64; 2], b: &[f64; 2]) -> bool {
        (a[0] - b[0]).abs() < self.tolerance && (a[1] - b[1]).abs() < self.tolerance
    }
}

fn exactly_equal(a: &[f64; 2], b: &[f64; 2]) -> bool {
    a[0] == b[0] && a[1] == b[1]
}

fn dedup_by<F>(ring: &[[f64; 2]], same: F) -> Ring
where
    F: Fn(&[f64; 2], &[f64; 2]) -> bool,
{
    ring.iter().fold(Vec::with_capacity(ring.len()), |mut kept, point| {
        if kept.last().is_none_or(|last| !same(last, point)) {
            kept.push(*point);
        }
        kept
    })
}

fn close_by<F>(mut ring: Ring, same: F) -> Ring
where
    F: Fn(&[f64; 2], &[f64; 2]) -> bool,
{
    let open = match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => !same(first, last),
        _ => false,
    };
    if open {
        ring.push(ring[0]);
    }
    ring
}

/// Fractional digits in the exact decimal expansion of the smallest subnormal
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Round to `precision` decimal digits, half away from zero.
///
/// Rounds the exact binary value, so `2.675` (stored just below the
/// midpoint) gives `2.67` at two digits while true ties such as `2.5` or
/// `0.0078125` go away from zero. Negative zero comes back as `0.0`; NaN and
/// infinities are returned unchanged.
pub fn round_half_away_from_zero(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let repr = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let precision = precision as usize;
    if frac_part.len() <= precision {
        return value + 0.0;
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(precision))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes()[precision] >= b'5' {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - precision;
    let mut text: String = digits[..split].iter().map(|d| char::from(b'0' + d)).collect();
    if precision > 0 {
        text.push('.');
        text.extend(digits[split..].iter().map(|d| char::from(b'0' + d)));
    }

    match text.parse::<f64>() {
        Ok(magnitude) if value.is_sign_negative() => -magnitude + 0.0,
        Ok(magnitude) => magnitude,
        Err(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(round_half_away_from_zero(1.0000005, 6), 1.000001);
        assert_eq!(round_half_away_from_zero(-1.0000005, 6), -1.000001);
        assert_eq!(round_half_away_from_zero(0.0078125, 6), 0.007813);
        assert_eq!(round_half_away_from_zero(2.5, 0), 3.0);
        assert_eq!(round_half_away_from_zero(-2.5, 0), -3.0);
        assert_eq!(round_half_away_from_zero(0.1234564, 6), 0.123456);
    }

    #[test]
    fn test_rounding_uses_exact_binary_value() {
        assert_eq!(round_half_away_from_zero(1.0000015, 6), 1.000001);
        assert_eq!(round_half_away_from_zero(0.1234565, 6), 0.123456);
        assert_eq!(round_half_away_from_zero(1.005, 2), 1.0);
        assert_eq!(round_half_away_from_zero(2.675, 2), 2.67);
        assert_eq!(round_half_away_from_zero(-2.675, 2), -2.67);
    }

    #[test]
    fn test_rounding_breaks_exact_ties_away_from_zero() {
        assert_eq!(round_half_away_from_zero(0.125, 2), 0.13);
        assert_eq!(round_half_away_from_zero(-0.125, 2), -0.13);
        assert_eq!(round_half_away_from_zero(0.5, 0), 1.0);
        assert_eq!(round_half_away_from_zero(1.5, 0), 2.0);
    }

    #[test]
    fn test_rounding_carries_into_integer_part() {
        assert_eq!(round_half_away_from_zero(9.99999951, 6), 10.0);
        assert_eq!(round_half_away_from_zero(-99.99999999, 6), -100.0);
        assert_eq!(round_half_away_from_zero(9.5, 0), 10.0);
    }

    #[test]
    fn test_rounding_handles_tiny_magnitudes() {
        assert_eq!(round_half_away_from_zero(f64::MIN_POSITIVE, 6), 0.0);
        assert_eq!(round_half_away_from_zero(5e-324, 6), 0.0);
        assert_eq!(round_half_away_from_zero(4.9e-7, 6), 0.0);
        assert_eq!(round_half_away_from_zero(5.1e-7, 6), 0.000001);
    }

    #[test]
    fn test_rounding_leaves_short_values_alone() {
        assert_eq!(round_half_away_from_zero(12.3, 6), 12.3);
        assert_eq!(round_half_away_from_zero(-7.0, 6), -7.0);
        assert!(round_half_away_from_zero(f64::NAN, 6).is_nan());
        assert_eq!(round_half_away_from_zero(f64::INFINITY, 6), f64::INFINITY);
    }

    #[test]
    fn test_rounding_drops_negative_zero() {
        let rounded = round_half_away_from_zero(-0.0000001, 6);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());
        assert!(round_half_away_from_zero(-0.0, 6).is_sign_positive());
    }

    #[test]
    fn test_dedup_within_tolerance() {
        let normalizer = RingNormalizer::default();
        let ring = vec![[0.0, 0.0], [0.0, 5e-9], [1.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        assert_eq!(
            normalizer.dedup_within(&ring),
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]
        );
    }

    #[test]
    fn test_close_within_respects_tolerance() {
        let normalizer = RingNormalizer::default();

        let nearly_closed = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [5e-9, 0.0]];
        assert_eq!(normalizer.close_within(nearly_closed.clone()), nearly_closed);

        let open = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        assert_eq!(
            normalizer.close_within(open),
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]
        );
    }

    #[test]
    fn test_rounding_pass_reintroduces_closure() {
        // The ends are within tolerance before rounding but land on
        // different sides of a rounding boundary afterwards.
        let normalizer = RingNormalizer::default();
        let ring = vec![
            [0.0000004999, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [0.0000005001, 0.0],
        ];

        let normalized = normalizer.normalize_ring(&ring).expect("Should survive");
        assert_eq!(normalized.first(), normalized.last());
        assert_eq!(
            normalized,
            vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [0.0, 1.0],
                [0.000001, 0.0],
                [0.0, 0.0],
            ]
        );
    }

    #[test]
    fn test_rounding_merges_neighbours() {
        let normalizer = RingNormalizer::default();
        let ring = vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0000001, 0.0],
            [1.0, 1.0],
            [0.0, 0.0],
        ];

        let normalized = normalizer.normalize_ring(&ring).expect("Should survive");
        assert_eq!(normalized, vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_short_ring_is_skipped() {
        let normalizer = RingNormalizer::default();
        assert_eq!(normalizer.normalize_ring(&[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]), None);
    }

    #[test]
    fn test_degenerate_ring_is_skipped() {
        let normalizer = RingNormalizer::default();
        let ring = vec![[0.0, 0.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.0]];
        assert_eq!(normalizer.normalize_ring(&ring), None);
    }

    #[test]
    fn test_ring_collapsing_under_rounding_is_skipped() {
        let normalizer = RingNormalizer::new(2, 1e-8);
        let ring = vec![[0.0, 0.0], [0.001, 0.0], [0.001, 0.001], [0.0, 0.0]];
        assert_eq!(normalizer.normalize_ring(&ring), None);
    }

    #[test]
    fn test_holes_are_ignored() {
        let normalizer = RingNormalizer::default();
        let with_hole = polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 10.0),
                (x: 0.0, y: 10.0),
                (x: 0.0, y: 0.0),
            ],
            interiors: [
                [
                    (x: 2.0, y: 2.0),
                    (x: 2.0, y: 4.0),
                    (x: 4.0, y: 4.0),
                    (x: 2.0, y: 2.0),
                ],
            ],
        );

        let ring = normalizer.normalize_exterior(&with_hole).expect("Should survive");
        assert_eq!(
            ring,
            vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]
        );
    }
}
