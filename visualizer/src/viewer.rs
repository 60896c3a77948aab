//! Ways of presenting a finished figure to the user.

use std::error::Error;

use crate::figure::Figure;

/// Presents a figure after its image has been written.
///
/// Whatever happens here has no effect on the artifact on disk.
pub trait Viewer {
    fn show(&self, figure: &Figure) -> Result<(), Box<dyn Error>>;
}

/// Returns immediately. Used for batch runs and headless machines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Viewer for Headless {
    fn show(&self, figure: &Figure) -> Result<(), Box<dyn Error>> {
        log::debug!("headless, not showing '{}'", figure.get_title());
        Ok(())
    }
}

#[cfg(feature = "viewer")]
pub use window::WindowViewer;

#[cfg(feature = "viewer")]
mod window {
    use std::error::Error;

    use druid::{AppLauncher, Widget, WindowDesc};
    use plotters_druid::Plot;

    use super::Viewer;
    use crate::figure::Figure;

    /// Opens a desktop window with the figure and blocks until it is closed.
    #[derive(Debug, Clone, Copy)]
    pub struct WindowViewer {
        pub size: (f64, f64),
    }

    impl Default for WindowViewer {
        fn default() -> Self {
            WindowViewer {
                size: (800.0, 600.0),
            }
        }
    }

    impl Viewer for WindowViewer {
        fn show(&self, figure: &Figure) -> Result<(), Box<dyn Error>> {
            let title = figure.get_title().to_string();
            let figure = figure.clone();
            let main_window = WindowDesc::new(move || chart_widget(figure))
                .title(title)
                .window_size(self.size)
                .resizable(true);

            AppLauncher::with_window(main_window)
                .launch(())
                .map_err(|e| format!("launch failed: {e}"))?;
            Ok(())
        }
    }

    fn chart_widget(figure: Figure) -> impl Widget<()> {
        Plot::new(move |_size, _data, root| {
            if let Err(e) = figure.draw_on(root) {
                log::warn!("could not draw '{}' in the window: {}", figure.get_title(), e);
            }
        })
    }
}
