//! Scroll buffer: a fixed list of rendered lines and a window onto it.
//!
//! Every mutating method leaves `offset` in `[0, max_offset()]`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    lines: Vec<String>,
    offset: usize,
    width: usize,
    height: usize,
}

impl Viewport {
    pub fn new(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
            offset: 0,
            width: 0,
            height: 0,
        }
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Visible content rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
        self.clamp();
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.set_offset(self.offset.saturating_add(n));
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.set_offset(self.offset.saturating_sub(n));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height.max(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.height.max(1));
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down((self.height / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.height / 2).max(1));
    }

    pub fn goto_top(&mut self) {
        self.offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Exactly `height` rows: the visible slice, padded with empty rows.
    pub fn visible(&self) -> Vec<&str> {
        let mut rows: Vec<&str> = self
            .lines
            .iter()
            .skip(self.offset)
            .take(self.height)
            .map(String::as_str)
            .collect();
        rows.resize(self.height, "");
        rows
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Viewport {
        let content: String = (1..=n).map(|i| format!("line {i}\n")).collect();
        Viewport::new(&content)
    }

    #[test]
    fn max_offset_accounts_for_height() {
        let mut vp = numbered(500);
        vp.set_size(80, 18);
        assert_eq!(vp.max_offset(), 482);
        vp.set_size(80, 600);
        assert_eq!(vp.max_offset(), 0);
    }

    #[test]
    fn scrolling_clamps() {
        let mut vp = numbered(30);
        vp.set_size(80, 10);
        vp.scroll_up(5);
        assert_eq!(vp.offset(), 0);
        vp.scroll_down(100);
        assert_eq!(vp.offset(), 20);
        vp.scroll_down(usize::MAX);
        assert_eq!(vp.offset(), 20);
    }

    #[test]
    fn page_and_half_page() {
        let mut vp = numbered(100);
        vp.set_size(80, 10);
        vp.page_down();
        assert_eq!(vp.offset(), 10);
        vp.half_page_down();
        assert_eq!(vp.offset(), 15);
        vp.half_page_up();
        vp.page_up();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn shrinking_content_window_reclamps() {
        let mut vp = numbered(50);
        vp.set_size(80, 10);
        vp.goto_bottom();
        assert_eq!(vp.offset(), 40);
        vp.set_size(80, 45);
        assert_eq!(vp.offset(), 5);
    }

    #[test]
    fn visible_is_padded_to_height() {
        let mut vp = numbered(3);
        vp.set_size(80, 5);
        assert_eq!(vp.visible(), vec!["line 1", "line 2", "line 3", "", ""]);
        vp.set_size(80, 2);
        vp.goto_bottom();
        assert_eq!(vp.visible(), vec!["line 2", "line 3"]);
    }

    #[test]
    fn empty_content() {
        let mut vp = Viewport::new("");
        vp.set_size(80, 10);
        assert_eq!(vp.total_lines(), 0);
        vp.page_down();
        vp.goto_bottom();
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible().len(), 10);
    }
}
