/*
[INPUT]:  Rendering commands from the map session
[OUTPUT]: Styled terminal lines; state kept in an inner MemoryMap
[POS]:    CLI view - MapView implementation for the terminal
[UPDATE]: When MapView gains commands or output styling changes
*/

use console::style;
use helper_map::map_view::{Annotation, CenterMode, MapView, MemoryMap};
use helper_map_adapter::Coordinate;

/// Prints every rendering command and remembers the resulting state.
#[derive(Debug, Default)]
pub struct TerminalMap {
    inner: MemoryMap,
    quiet: bool,
    lines_written: usize,
}

impl TerminalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track state without printing marker changes.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        self.inner.annotations.values().cloned().collect()
    }

    /// Print a marker change unless quiet.
    fn echo(&mut self, line: String) {
        if self.quiet {
            return;
        }
        println!("{line}");
        self.lines_written += 1;
    }
}

impl MapView for TerminalMap {
    fn set_view(&mut self, center: Coordinate, zoom: u8, mode: CenterMode) {
        self.inner.set_view(center, zoom, mode);
        self.echo(format!(
            "{} {:.5}, {:.5} ({:?})",
            style("view").dim(),
            center.latitude,
            center.longitude,
            mode
        ));
    }

    fn place_user_marker(&mut self, at: Coordinate) {
        self.inner.place_user_marker(at);
        self.echo(format!(
            "{} {:.5}, {:.5}",
            style("You are here!").bold().blue(),
            at.latitude,
            at.longitude
        ));
    }

    fn add_annotation(&mut self, annotation: Annotation) {
        self.echo(format_annotation(&annotation));
        self.inner.add_annotation(annotation);
    }

    fn remove_annotation(&mut self, task_id: i64) {
        self.inner.remove_annotation(task_id);
        self.echo(format!("{} task #{}", style("removed").dim(), task_id));
    }

    fn open_popup(&mut self, task_id: i64) {
        self.inner.open_popup(task_id);
        if let Some(annotation) = self.inner.annotations.get(&task_id) {
            println!("{}", style(annotation.popup_text()).cyan());
        }
    }

    fn close_popup(&mut self) {
        self.inner.close_popup();
    }

    fn notify(&mut self, message: &str) {
        self.inner.notify(message);
        eprintln!("{}", style(message).red().bold());
    }
}

pub fn format_annotation(annotation: &Annotation) -> String {
    format!(
        "{} {} {} {}",
        style(format!("#{:<4}", annotation.task_id)).red(),
        style(&annotation.title).bold(),
        style(format!("${}", annotation.reward)).green(),
        style(format!("{:.2} km", annotation.distance_km)).dim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_map_prints_no_markers() {
        let mut map = TerminalMap::quiet();
        let at = Coordinate::new(51.505, -0.1);
        map.set_view(at, 13, CenterMode::Force);
        map.place_user_marker(at);

        assert_eq!(map.lines_written, 0);
        assert_eq!(map.inner.user_marker, Some(at));
    }

    #[test]
    fn test_map_prints_user_marker() {
        let mut map = TerminalMap::new();
        map.place_user_marker(Coordinate::new(51.505, -0.1));
        assert_eq!(map.lines_written, 1);
    }
}
