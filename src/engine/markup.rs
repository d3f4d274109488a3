use crate::assets::codec::{data_url, encode_png};
use crate::assets::logo::LogoImage;
use crate::config::style::{
    CornerDotType, CornerSquareType, DotType, Gradient, GradientType, ImageOptions,
};
use crate::engine::EngineOptions;
use crate::engine::matrix::{FINDER_SIZE, ModuleMatrix};
use crate::foundation::error::{QrFrameError, QrFrameResult};
use crate::foundation::xml::{escape_attr, fmt_num};

/// Pixel geometry of a symbol inside the output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolLayout {
    /// Modules per side.
    pub count: usize,
    /// Module side in pixels (integral).
    pub dot: f64,
    /// Left edge of the symbol.
    pub x0: f64,
    /// Top edge of the symbol.
    pub y0: f64,
}

impl SymbolLayout {
    /// Fit `count` modules into `width x height` minus `margin` on every side.
    pub fn compute(width: u32, height: u32, margin: u32, count: usize) -> QrFrameResult<Self> {
        let area = f64::from(width.min(height)) - 2.0 * f64::from(margin);
        let dot = (area / count as f64).floor();
        if dot < 1.0 {
            return Err(QrFrameError::engine(format!(
                "symbol of {count} modules does not fit in {area}px"
            )));
        }
        let symbol = dot * count as f64;
        Ok(Self {
            count,
            dot,
            x0: ((f64::from(width) - symbol) / 2.0).floor(),
            y0: ((f64::from(height) - symbol) / 2.0).floor(),
        })
    }

    /// Symbol side in pixels.
    pub fn symbol_size(&self) -> f64 {
        self.dot * self.count as f64
    }
}

/// Logo rectangle plus the module span it clears.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoBox {
    /// Left edge in pixels.
    pub x: f64,
    /// Top edge in pixels.
    pub y: f64,
    /// Drawn width in pixels.
    pub w: f64,
    /// Drawn height in pixels.
    pub h: f64,
    cols: (usize, usize),
    rows: (usize, usize),
}

impl LogoBox {
    /// Centre the logo at `image_size` of the symbol, keeping its aspect ratio.
    pub fn compute(layout: &SymbolLayout, logo: &LogoImage, io: &ImageOptions) -> Option<Self> {
        let max_side = layout.symbol_size() * io.image_size;
        let aspect = f64::from(logo.width()) / f64::from(logo.height());
        let (w, h) = if aspect >= 1.0 {
            (max_side, max_side / aspect)
        } else {
            (max_side * aspect, max_side)
        };
        if w < 1.0 || h < 1.0 {
            return None;
        }

        let margin = f64::from(io.margin);
        let span = |len: f64| {
            let mut n = ((len + 2.0 * margin) / layout.dot).ceil() as usize;
            if (layout.count.saturating_sub(n)) % 2 == 1 {
                n += 1;
            }
            let n = n.min(layout.count);
            let start = (layout.count - n) / 2;
            (start, start + n)
        };

        Some(Self {
            x: layout.x0 + (layout.symbol_size() - w) / 2.0,
            y: layout.y0 + (layout.symbol_size() - h) / 2.0,
            w,
            h,
            cols: span(w),
            rows: span(h),
        })
    }

    /// Return `true` when the module at `(row, col)` lies under the logo.
    pub fn covers(&self, row: usize, col: usize) -> bool {
        (self.rows.0..self.rows.1).contains(&row) && (self.cols.0..self.cols.1).contains(&col)
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Neighbors {
    top: bool,
    right: bool,
    bottom: bool,
    left: bool,
}

/// Build the complete SVG document for one styled symbol.
pub fn build_svg(matrix: &ModuleMatrix, opts: &EngineOptions) -> QrFrameResult<String> {
    let style = &opts.style;
    let layout = SymbolLayout::compute(opts.width, opts.height, style.margin, matrix.count())?;
    let logo_box = opts
        .logo
        .as_deref()
        .and_then(|logo| LogoBox::compute(&layout, logo, &style.image_options));
    let hide_under_logo = style.image_options.hide_background_dots;

    let canvas_rect = (0.0, 0.0, f64::from(opts.width), f64::from(opts.height));
    let symbol_rect = (layout.x0, layout.y0, layout.symbol_size(), layout.symbol_size());
    let mut defs = String::new();
    let mut body = String::new();

    let bg = &style.background_options;
    if bg.gradient.is_some() || !bg.color.trim().eq_ignore_ascii_case("transparent") {
        let fill = paint("background-color", &bg.color, bg.gradient.as_ref(), canvas_rect, &mut defs);
        body.push_str(&format!(
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{fill}"/>"#,
            opts.width, opts.height
        ));
    }

    let dots = &style.dots_options;
    let filled = |row: isize, col: isize| -> bool {
        if !matrix.is_dark(row, col) {
            return false;
        }
        let (r, c) = (row as usize, col as usize);
        if matrix.is_finder(r, c) {
            return false;
        }
        !(hide_under_logo && logo_box.is_some_and(|b| b.covers(r, c)))
    };
    let mut dot_shapes = String::new();
    for row in 0..matrix.count() as isize {
        for col in 0..matrix.count() as isize {
            if !filled(row, col) {
                continue;
            }
            let n = Neighbors {
                top: filled(row - 1, col),
                right: filled(row, col + 1),
                bottom: filled(row + 1, col),
                left: filled(row, col - 1),
            };
            let x = layout.x0 + col as f64 * layout.dot;
            let y = layout.y0 + row as f64 * layout.dot;
            dot_shapes.push_str(&dot_shape(dots.kind, x, y, layout.dot, n));
        }
    }
    let dots_fill = paint("dots-color", &dots.color, dots.gradient.as_ref(), symbol_rect, &mut defs);
    body.push_str(&format!(r#"<g fill="{dots_fill}">{dot_shapes}</g>"#));

    let cs = &style.corners_square_options;
    let (cs_color, cs_gradient) = match (&cs.color, &cs.gradient) {
        (_, Some(g)) => (cs.color.clone().unwrap_or_default(), Some(g)),
        (Some(c), None) => (c.clone(), None),
        (None, None) => (dots.color.clone(), dots.gradient.as_ref()),
    };
    let cd = &style.corners_dot_options;
    let (cd_color, cd_gradient) = match (&cd.color, &cd.gradient) {
        (_, Some(g)) => (cd.color.clone().unwrap_or_default(), Some(g)),
        (Some(c), None) => (c.clone(), None),
        (None, None) => (dots.color.clone(), dots.gradient.as_ref()),
    };
    let cs_fill = paint("corners-square-color", &cs_color, cs_gradient, symbol_rect, &mut defs);
    let cd_fill = paint("corners-dot-color", &cd_color, cd_gradient, symbol_rect, &mut defs);

    let s = layout.dot;
    let mut rings = String::new();
    let mut centres = String::new();
    for (row, col) in matrix.finder_origins() {
        let x = layout.x0 + col as f64 * s;
        let y = layout.y0 + row as f64 * s;
        rings.push_str(&corner_square_shape(cs.kind.unwrap_or(CornerSquareType::Square), x, y, s));
        centres.push_str(&corner_dot_shape(
            cd.kind.unwrap_or(CornerDotType::Square),
            x + 2.0 * s,
            y + 2.0 * s,
            s,
        ));
    }
    body.push_str(&format!(r#"<g fill="{cs_fill}">{rings}</g>"#));
    body.push_str(&format!(r#"<g fill="{cd_fill}">{centres}</g>"#));

    if let (Some(logo), Some(b)) = (opts.logo.as_deref(), logo_box) {
        let href = data_url("image/png", &encode_png(logo.pixels())?);
        body.push_str(&format!(
            r#"<image href="{href}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none"/>"#,
            fmt_num(b.x),
            fmt_num(b.y),
            fmt_num(b.w),
            fmt_num(b.h)
        ));
    }

    Ok(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs>{defs}</defs>{body}</svg>"#,
        w = opts.width,
        h = opts.height
    ))
}

fn paint(
    id: &str,
    color: &str,
    gradient: Option<&Gradient>,
    rect: (f64, f64, f64, f64),
    defs: &mut String,
) -> String {
    match gradient {
        Some(g) => {
            defs.push_str(&gradient_def(id, g, rect));
            format!("url(#{id})")
        }
        None => escape_attr(color),
    }
}

fn gradient_def(id: &str, g: &Gradient, (x, y, w, h): (f64, f64, f64, f64)) -> String {
    let cx = x + w / 2.0;
    let cy = y + h / 2.0;
    let half = w.max(h) / 2.0;
    let stops: String = g
        .color_stops
        .iter()
        .map(|s| {
            format!(
                r#"<stop offset="{}" stop-color="{}"/>"#,
                fmt_num(s.offset),
                escape_attr(&s.color)
            )
        })
        .collect();
    match g.kind {
        GradientType::Linear => {
            let (sin, cos) = g.rotation.sin_cos();
            format!(
                r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">{stops}</linearGradient>"#,
                fmt_num(cx - cos * half),
                fmt_num(cy - sin * half),
                fmt_num(cx + cos * half),
                fmt_num(cy + sin * half)
            )
        }
        GradientType::Radial => format!(
            r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}">{stops}</radialGradient>"#,
            fmt_num(cx),
            fmt_num(cy),
            fmt_num(half)
        ),
    }
}

fn dot_shape(kind: DotType, x: f64, y: f64, s: f64, n: Neighbors) -> String {
    let half = s / 2.0;
    let quarter = s / 4.0;
    // (first side free, second side free) for tl, tr, br, bl.
    let sides = [
        (!n.top, !n.left),
        (!n.top, !n.right),
        (!n.bottom, !n.right),
        (!n.bottom, !n.left),
    ];
    let both = |(a, b): (bool, bool)| a && b;
    let radii: [f64; 4] = match kind {
        DotType::Square => [0.0; 4],
        DotType::Dots => return circle(x + half, y + half, half),
        DotType::Rounded => sides.map(|c| if both(c) { half } else { 0.0 }),
        DotType::ExtraRounded => sides.map(|(a, b)| match (a, b) {
            (true, true) => half,
            (true, false) | (false, true) => quarter,
            (false, false) => 0.0,
        }),
        DotType::Classy => [
            if both(sides[0]) { half } else { 0.0 },
            0.0,
            if both(sides[2]) { half } else { 0.0 },
            0.0,
        ],
        DotType::ClassyRounded => [
            if both(sides[0]) { half } else { 0.0 },
            if both(sides[1]) { quarter } else { 0.0 },
            if both(sides[2]) { half } else { 0.0 },
            if both(sides[3]) { quarter } else { 0.0 },
        ],
    };
    if radii.iter().all(|r| *r == 0.0) {
        return format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
            fmt_num(x),
            fmt_num(y),
            fmt_num(s),
            fmt_num(s)
        );
    }
    format!(r#"<path d="{}"/>"#, rounded_rect_path(x, y, s, s, radii))
}

fn corner_square_shape(kind: CornerSquareType, x: f64, y: f64, s: f64) -> String {
    let outer = FINDER_SIZE as f64 * s;
    let inner = outer - 2.0 * s;
    let d = match kind {
        CornerSquareType::Square => format!(
            "{}{}",
            rounded_rect_path(x, y, outer, outer, [0.0; 4]),
            rounded_rect_path(x + s, y + s, inner, inner, [0.0; 4])
        ),
        CornerSquareType::Dot => {
            let (cx, cy) = (x + outer / 2.0, y + outer / 2.0);
            format!(
                "{}{}",
                circle_path(cx, cy, outer / 2.0),
                circle_path(cx, cy, inner / 2.0)
            )
        }
        CornerSquareType::ExtraRounded => format!(
            "{}{}",
            rounded_rect_path(x, y, outer, outer, [2.5 * s; 4]),
            rounded_rect_path(x + s, y + s, inner, inner, [1.5 * s; 4])
        ),
    };
    format!(r#"<path fill-rule="evenodd" d="{d}"/>"#)
}

fn corner_dot_shape(kind: CornerDotType, x: f64, y: f64, s: f64) -> String {
    let side = 3.0 * s;
    match kind {
        CornerDotType::Square => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
            fmt_num(x),
            fmt_num(y),
            fmt_num(side),
            fmt_num(side)
        ),
        CornerDotType::Dot => circle(x + side / 2.0, y + side / 2.0, side / 2.0),
    }
}

fn circle(cx: f64, cy: f64, r: f64) -> String {
    format!(
        r#"<circle cx="{}" cy="{}" r="{}"/>"#,
        fmt_num(cx),
        fmt_num(cy),
        fmt_num(r)
    )
}

fn circle_path(cx: f64, cy: f64, r: f64) -> String {
    let (l, rr, c, r) = (fmt_num(cx - r), fmt_num(cx + r), fmt_num(cy), fmt_num(r));
    format!("M{l} {c}A{r} {r} 0 1 0 {rr} {c}A{r} {r} 0 1 0 {l} {c}Z")
}

/// Rectangle path with per-corner radii `[tl, tr, br, bl]`.
fn rounded_rect_path(x: f64, y: f64, w: f64, h: f64, [tl, tr, br, bl]: [f64; 4]) -> String {
    let mut d = format!("M{} {}", fmt_num(x + tl), fmt_num(y));
    d.push_str(&format!("H{}", fmt_num(x + w - tr)));
    if tr > 0.0 {
        d.push_str(&arc(tr, x + w, y + tr));
    }
    d.push_str(&format!("V{}", fmt_num(y + h - br)));
    if br > 0.0 {
        d.push_str(&arc(br, x + w - br, y + h));
    }
    d.push_str(&format!("H{}", fmt_num(x + bl)));
    if bl > 0.0 {
        d.push_str(&arc(bl, x, y + h - bl));
    }
    d.push_str(&format!("V{}", fmt_num(y + tl)));
    if tl > 0.0 {
        d.push_str(&arc(tl, x + tl, y));
    }
    d.push('Z');
    d
}

fn arc(r: f64, to_x: f64, to_y: f64) -> String {
    let r = fmt_num(r);
    format!("A{r} {r} 0 0 1 {} {}", fmt_num(to_x), fmt_num(to_y))
}

#[cfg(test)]
#[path = "../../tests/unit/engine/markup.rs"]
mod tests;
