/// One cell of the waveform display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    Empty,
    Bar,
    Marker,
}

/// Fixed-size raster the editor draws into. Row 0 is the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Pixel::Empty);
    }

    /// Fill the bottom `bar_height` cells of column `x`
    pub fn bar(&mut self, x: usize, bar_height: usize) {
        if x >= self.width {
            return;
        }
        let top = self.height - bar_height.min(self.height);
        for y in top..self.height {
            self.pixels[y * self.width + x] = Pixel::Bar;
        }
    }

    /// Draw a full-height 1-pixel marker at column `x`
    pub fn marker(&mut self, x: usize) {
        if x >= self.width {
            return;
        }
        for y in 0..self.height {
            self.pixels[y * self.width + x] = Pixel::Marker;
        }
    }

    /// Column `x` from top to bottom
    #[cfg(test)]
    pub fn column(&self, x: usize) -> Vec<Pixel> {
        (0..self.height).filter_map(|y| self.get(x, y)).collect()
    }

    /// Text rendering: `#` for bars, `|` for markers
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.pixels.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|p| match p {
                Pixel::Empty => ' ',
                Pixel::Bar => '#',
                Pixel::Marker => '|',
            }));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_grow_from_the_bottom() {
        let mut frame = Frame::new(2, 4);
        frame.bar(0, 2);
        frame.bar(1, 10);

        assert_eq!(
            frame.column(0),
            vec![Pixel::Empty, Pixel::Empty, Pixel::Bar, Pixel::Bar]
        );
        assert_eq!(frame.column(1), vec![Pixel::Bar; 4]);
    }

    #[test]
    fn text_rendering() {
        let mut frame = Frame::new(3, 2);
        frame.bar(0, 1);
        frame.marker(2);
        assert_eq!(frame.to_text(), "  |\n# |\n");

        frame.clear();
        assert_eq!(frame.to_text(), "   \n   \n");
    }

    #[test]
    fn out_of_range_drawing_is_ignored() {
        let mut frame = Frame::new(2, 2);
        frame.marker(5);
        frame.bar(2, 1);
        assert_eq!(frame, Frame::new(2, 2));
        assert_eq!(frame.get(2, 0), None);
    }
}
