use us_map_projection::prelude::*;
use us_map_projection_examples::{init_tracing, Canvas, RenderConfig};

const CITIES: [(&str, [f64; 2]); 9] = [
    ("Chicago", [-87.6298, 41.8781]),
    ("Los Angeles", [-118.2437, 34.0522]),
    ("St. Louis", [-90.1994, 38.6270]),
    ("Honolulu", [-157.8583, 21.3069]),
    ("Anchorage", [-149.9003, 61.2181]),
    ("San Juan", [-66.1057, 18.4655]),
    ("Charlotte Amalie", [-64.9307, 18.3419]),
    ("Pago Pago", [-170.7020, -14.2756]),
    ("Hagåtña", [144.7502, 13.4791]),
];

fn main() -> anyhow::Result<()> {
    init_tracing();

    let projection = UsMapProjection::default();
    let viewbox = projection.config().viewbox;
    let mut canvas = Canvas::new(
        RenderConfig::new((viewbox.x as u32, viewbox.y as u32)).with_point_radius(3),
    );

    // Reserved inset rectangles, in pixels
    canvas.set_stroke([170, 170, 170]);
    for inset in projection.insets() {
        if let Some(extent) = inset.projection.clip_extent() {
            canvas.outline(&extent);
        }
    }

    canvas.set_stroke([200, 40, 40]);
    for (name, lon_lat) in CITIES {
        match projection.project(lon_lat) {
            Some(xy) => {
                let back = projection.invert(xy);
                let owner = projection.inset_at(xy).map_or("lower 48", |i| i.name);
                println!(
                    "{name:<18} [{:>9.4}, {:>8.4}] -> [{:>8.3}, {:>8.3}] via {owner:<34} (inverse [{:.4}, {:.4}])",
                    lon_lat[0], lon_lat[1], xy.x, xy.y, back.x, back.y
                );
                canvas.point(xy.x, xy.y);
            }
            None => println!("{name:<18} not shown"),
        }
    }

    canvas.save_png("project-cities.png")?;
    Ok(())
}
