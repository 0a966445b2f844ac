use std::env;

use us_map_projection::prelude::*;
use us_map_projection_examples::{graticule, init_tracing, Canvas, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Scope names from the command line, or every scope.
    let scopes = env::args()
        .skip(1)
        .map(|arg| arg.parse::<Scope>())
        .collect::<Result<Vec<_>>>()?;
    let scopes = if scopes.is_empty() {
        vec![Scope::All, Scope::States, Scope::Lower48]
    } else {
        scopes
    };

    let lines = graticule(5.0);
    for scope in scopes {
        let mut projection = UsMapProjection::from_scope(scope);
        let viewbox = projection.config().viewbox;
        let canvas = shared(Canvas::new(
            RenderConfig::new((viewbox.x as u32, viewbox.y as u32)).with_stroke([60, 90, 160]),
        ));
        let sink: SharedStream = canvas.clone();
        projection.stream_geometry(&lines, &sink);

        let mut canvas = canvas.borrow_mut();
        canvas.set_stroke([200, 40, 40]);
        for inset in projection.insets() {
            if let Some(extent) = inset.projection.clip_extent() {
                canvas.outline(&extent);
            }
        }
        canvas.save_png(format!("graticule-{scope}.png"))?;
    }

    Ok(())
}
