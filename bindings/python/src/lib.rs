//! Python bindings for texbox

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use texbox::{render, LayoutOptions};

/// Lay out `latex` in display style at `size` points.
///
/// Returns `(width, height, depth)` in points.
#[pyfunction]
#[pyo3(signature = (latex, size = 20.0, inline = false))]
fn layout(latex: &str, size: f64, inline: bool) -> PyResult<(f64, f64, f64)> {
    let options = if inline {
        LayoutOptions::inline(size)
    } else {
        LayoutOptions::display(size)
    };
    let icon = render(latex, &options).map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok((icon.width(), icon.height(), icon.depth()))
}

/// Parse `latex` and return the error message, or `None` when it is valid
#[pyfunction]
fn check(latex: &str) -> Option<String> {
    texbox::parse(latex).err().map(|e| e.to_string())
}

#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(layout, m)?)?;
    m.add_function(wrap_pyfunction!(check, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
