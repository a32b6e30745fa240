//! Pixel-grid simulation of collage placements.
//!
//! Every canvas pixel records which image was drawn there, making any
//! geometric error immediately detectable: overlapping placements, images
//! running off the canvas, gaps between neighbors, or rows out of order all
//! show up as wrong cells.

use proptest::prelude::*;
use zencollage::*;

// ---- Pixel simulation ----

/// A canvas pixel that remembers which image covers it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Pixel {
    /// Covered by the image at this input index.
    Image(usize),
    /// Background.
    Fill,
}

#[derive(Clone, Debug)]
struct Grid {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Grid {
    fn blank(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            pixels: vec![Pixel::Fill; (size.width * size.height) as usize],
        }
    }

    fn get(&self, x: u32, y: u32) -> Pixel {
        assert!(
            x < self.width && y < self.height,
            "({x},{y}) out of bounds {}x{}",
            self.width,
            self.height
        );
        self.pixels[(y * self.width + x) as usize]
    }

    /// Paint `rect` with `pixel`. Panics on overlap or out-of-bounds.
    fn paint(&mut self, rect: Rect, pixel: Pixel) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let prev = self.get(x, y);
                assert_eq!(prev, Pixel::Fill, "{pixel:?} overlaps {prev:?} at ({x},{y})");
                self.pixels[(y * self.width + x) as usize] = pixel;
            }
        }
    }

    fn count(&self, pixel: Pixel) -> usize {
        self.pixels.iter().filter(|&&p| p == pixel).count()
    }
}

/// Draw every visible placement onto a blank canvas.
fn render(layout: &Layout) -> Grid {
    let mut grid = Grid::blank(layout.canvas);
    for p in &layout.placements {
        grid.paint(p.visible(), Pixel::Image(p.index));
    }
    grid
}

fn mixed() -> [Size; 4] {
    [
        Size::new(500, 500),
        Size::new(1000, 500),
        Size::new(250, 500),
        Size::new(1000, 500),
    ]
}

// ---- Fixed layouts ----

#[test]
fn mixed_collage_cells() {
    let plan = plan_collage(&mixed()).unwrap();
    let grid = render(&plan.layout);
    assert_eq!((grid.width, grid.height), (1250, 918));

    // Row 0: 417×417 then 833×417.
    assert_eq!(grid.get(0, 0), Pixel::Image(0));
    assert_eq!(grid.get(416, 416), Pixel::Image(0));
    assert_eq!(grid.get(417, 0), Pixel::Image(1));
    assert_eq!(grid.get(1249, 416), Pixel::Image(1));

    // Row 1: 250×500 then 1000×500, starting at y = 417.
    assert_eq!(grid.get(0, 417), Pixel::Image(2));
    assert_eq!(grid.get(249, 916), Pixel::Image(2));
    assert_eq!(grid.get(250, 417), Pixel::Image(3));
    assert_eq!(grid.get(1249, 916), Pixel::Image(3));

    // Last line is even-height padding.
    for x in 0..1250 {
        assert_eq!(grid.get(x, 917), Pixel::Fill);
    }
    assert_eq!(grid.count(Pixel::Fill), 1250);
}

#[test]
fn clipped_image_stops_at_right_edge() {
    let sizes = [
        Size::new(10, 10),
        Size::new(3, 10),
        Size::new(3, 10),
        Size::new(3, 10),
        Size::new(3, 10),
    ];
    let scaled = scale_rows(&sizes, &[0..1, 1..5]).unwrap();
    let layout = compose(&scaled).unwrap();
    let grid = render(&layout);

    assert_eq!(layout.canvas, Size::new(10, 18));
    // Row 1 starts at y = 10 with four 3×8 images; the last has one column left.
    assert_eq!(grid.get(8, 10), Pixel::Image(3));
    assert_eq!(grid.get(9, 10), Pixel::Image(4));
    assert_eq!(grid.get(9, 17), Pixel::Image(4));
    assert_eq!(grid.count(Pixel::Image(4)), 8);
}

#[test]
fn single_image_fills_canvas() {
    let plan = plan_collage(&[Size::new(640, 480)]).unwrap();
    let grid = render(&plan.layout);
    assert_eq!(grid.count(Pixel::Fill), 0);
    assert_eq!(grid.count(Pixel::Image(0)), 640 * 480);
}

// ---- Randomized layouts ----

/// Normalized inputs: all 40 px tall, 20–160 px wide.
fn normalized_sizes() -> impl Strategy<Value = Vec<Size>> {
    prop::collection::vec(20u32..=160, 1..15)
        .prop_map(|widths| widths.into_iter().map(|w| Size::new(w, 40)).collect::<Vec<_>>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn random_collages_tile_without_overlap(sizes in normalized_sizes()) {
        let plan = plan_collage(&sizes).unwrap();
        let layout = &plan.layout;

        let visible: Vec<Rect> = layout.placements.iter().map(Placement::visible).collect();
        for (i, a) in visible.iter().enumerate() {
            prop_assert!(a.is_within(layout.canvas), "{:?} outside {:?}", a, layout.canvas);
            for b in &visible[i + 1..] {
                prop_assert!(!a.intersects(b), "{:?} overlaps {:?} in {:?}", a, b, sizes);
            }
        }

        // Painting asserts no overlap and stays in bounds.
        let grid = render(layout);

        let painted: usize = visible.iter().map(|v| (v.width * v.height) as usize).sum();
        prop_assert_eq!(grid.pixels.len() - grid.count(Pixel::Fill), painted, "{:?}", sizes);

        for i in 0..sizes.len() {
            prop_assert!(grid.count(Pixel::Image(i)) > 0, "image {} hidden in {:?}", i, sizes);
        }
    }

    #[test]
    fn random_collages_have_no_interior_gaps(sizes in normalized_sizes()) {
        // Uniform source heights give uniform heights within a row, so the only
        // background is the even-size padding on the right and bottom.
        let plan = plan_collage(&sizes).unwrap();
        let layout = &plan.layout;
        let grid = render(layout);

        let narrowest = layout.rows.iter().map(|r| r.width).min().unwrap();
        prop_assert!(layout.canvas.width - narrowest <= 1, "{:?}", sizes);
        for y in 0..layout.content_height {
            for x in 0..narrowest {
                prop_assert_ne!(grid.get(x, y), Pixel::Fill, "gap at ({},{}) in {:?}", x, y, sizes);
            }
        }
    }

    #[test]
    fn rows_stack_and_run_in_input_order(sizes in normalized_sizes()) {
        let plan = plan_collage(&sizes).unwrap();
        let layout = &plan.layout;

        let mut y = 0;
        for band in &layout.rows {
            prop_assert_eq!(band.y, y);
            let mut x = 0;
            for p in &layout.placements[band.images.clone()] {
                prop_assert_eq!((p.x, p.y), (x, band.y), "{:?}", sizes);
                prop_assert!(p.size.height <= band.height);
                x += p.size.width;
            }
            prop_assert_eq!(x, band.width);
            y += band.height;
        }
        prop_assert_eq!(y, layout.content_height);
        prop_assert_eq!(layout.canvas.height % 2, 0);
        prop_assert_eq!(layout.canvas.width % 2, 0);

        // Top-left corners in reading order are the input order.
        let mut corners: Vec<(u32, u32, usize)> =
            layout.placements.iter().map(|p| (p.y, p.x, p.index)).collect();
        corners.sort();
        let order: Vec<usize> = corners.iter().map(|c| c.2).collect();
        prop_assert_eq!(order, (0..sizes.len()).collect::<Vec<_>>());
    }

    #[test]
    fn row_widths_converge(sizes in normalized_sizes()) {
        let plan = plan_collage(&sizes).unwrap();
        let target = plan.scaled.target_width;
        for row in &plan.scaled.rows {
            let w = row.width();
            let slack = row.images.len() as u64;
            prop_assert!(
                w + slack >= target && w <= target + slack,
                "row width {} vs target {} in {:?}",
                w,
                target,
                sizes
            );
        }
    }
}
