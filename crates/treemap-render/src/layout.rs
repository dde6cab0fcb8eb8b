//! Squarified treemap layout (Bruls, Huizing, van Wijk).

/// A laid-out cell. Zero-weight inputs degenerate to zero-area rectangles
/// anchored where the layout cursor stood, which is accepted behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Lay out `weights` inside `bounds`, one rectangle per weight, area
/// proportional to weight. Rows are placed along the shorter side of the
/// remaining free rectangle and grow while the worst aspect ratio in the
/// row does not degrade. Works best with weights sorted descending, which
/// is what the renderer feeds it. `padding` insets each cell on its
/// right/bottom edge to leave a visible gap between neighbors.
///
/// The layout is a pure function of its inputs: identical weights produce
/// identical rectangles.
pub fn squarify(weights: &[f64], bounds: Rect, padding: f64) -> Vec<Rect> {
    let n = weights.len();
    let mut rects = vec![Rect::new(bounds.x0, bounds.y0, bounds.x0, bounds.y0); n];
    if n == 0 {
        return rects;
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        // Every cell degenerates; nothing to scale.
        return rects;
    }

    let scale = bounds.area() / total;
    let areas: Vec<f64> = weights.iter().map(|w| w.max(0.0) * scale).collect();

    let mut x = bounds.x0;
    let mut y = bounds.y0;
    let mut free_w = bounds.width();
    let mut free_h = bounds.height();

    let mut start = 0;
    while start < n {
        let side = free_w.min(free_h);

        // Grow the row while the worst aspect ratio does not get worse.
        let mut end = start + 1;
        let mut best = worst_ratio(&areas[start..end], side);
        while end < n {
            let candidate = worst_ratio(&areas[start..end + 1], side);
            if candidate > best {
                break;
            }
            best = candidate;
            end += 1;
        }

        let row_sum: f64 = areas[start..end].iter().sum();

        if free_w >= free_h {
            // Vertical strip against the left edge of the free rectangle.
            let strip_w = if free_h > 0.0 { row_sum / free_h } else { 0.0 };
            let mut cursor = y;
            for (i, &area) in areas[start..end].iter().enumerate() {
                let cell_h = if strip_w > 0.0 { area / strip_w } else { 0.0 };
                rects[start + i] = Rect::new(x, cursor, x + strip_w, cursor + cell_h);
                cursor += cell_h;
            }
            x += strip_w;
            free_w -= strip_w;
        } else {
            // Horizontal strip against the top edge.
            let strip_h = if free_w > 0.0 { row_sum / free_w } else { 0.0 };
            let mut cursor = x;
            for (i, &area) in areas[start..end].iter().enumerate() {
                let cell_w = if strip_h > 0.0 { area / strip_h } else { 0.0 };
                rects[start + i] = Rect::new(cursor, y, cursor + cell_w, y + strip_h);
                cursor += cell_w;
            }
            y += strip_h;
            free_h -= strip_h;
        }

        start = end;
    }

    if padding > 0.0 {
        for rect in &mut rects {
            rect.x1 = (rect.x1 - padding).max(rect.x0);
            rect.y1 = (rect.y1 - padding).max(rect.y0);
        }
    }

    rects
}

/// Worst aspect ratio among `row` areas when laid along a strip of length
/// `side`. Infinite for empty/degenerate rows so they never tempt the
/// grow-the-row loop away from a finite ratio.
fn worst_ratio(row: &[f64], side: f64) -> f64 {
    let sum: f64 = row.iter().sum();
    if sum <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }

    let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = row.iter().cloned().fold(f64::INFINITY, f64::min);
    if min <= 0.0 {
        return f64::INFINITY;
    }

    let s2 = sum * sum;
    let w2 = side * side;
    (w2 * max / s2).max(s2 / (w2 * min))
}
