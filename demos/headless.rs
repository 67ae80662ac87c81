use maplet_triangle::prelude::*;

/// Example of driving triangle markers headlessly: the host owns the view,
/// re-projects markers on view changes and runs the canvas draw passes.
fn main() -> anyhow::Result<()> {
    maplet_triangle::init_logging();

    println!("🗺️ Triangle Marker Headless Example");
    println!("===================================");

    let center = LatLng::new(52.2297, 21.0122); // Warsaw
    let mut viewport = Viewport::new(center, 12.0, Point::new(1024.0, 768.0));
    let renderer = canvas(RendererOptions::default());
    lock(&renderer).update_bounds(&viewport);

    let mut markers = vec![
        TriangleMarker::new(
            center,
            TriangleMarkerOptions::default()
                .id("wind")
                .renderer(renderer.clone()),
        ),
        triangle_marker(
            [52.25, 21.05],
            TriangleMarkerOptions::default()
                .id("heading")
                .width(16.0)
                .height(24.0)
                .rotation(135.0)
                .style(PathOptions::new().color("#e4572e").fill_opacity(0.6))
                .renderer(renderer.clone()),
        )
        .map_err(|e| anyhow::anyhow!(e))?,
    ];

    markers[1].on("move", |event| {
        let LayerEvent::Move { layer_id, lat_lng } = event;
        println!("   ➡️  {} moved to ({:.4}, {:.4})", layer_id, lat_lng.lat, lat_lng.lng);
    });

    for marker in markers.iter_mut() {
        marker.on_viewport_changed(&viewport).map_err(|e| anyhow::anyhow!(e))?;
    }
    draw(&renderer, &markers);

    println!("\n🎯 Updating markers:");
    markers[0].set_rotation(90.0);
    markers[1]
        .set_position((52.26, 21.06))
        .map_err(|e| anyhow::anyhow!(e))?;
    markers[1].reproject_and_bound(&viewport);
    draw(&renderer, &markers);

    println!("\n🔍 Zooming out:");
    viewport.set_zoom(9.0);
    lock(&renderer).update_bounds(&viewport);
    for marker in markers.iter_mut() {
        marker.reproject_and_bound(&viewport);
    }
    lock(&renderer).request_redraw(None);
    draw(&renderer, &markers);

    if let Some(point) = markers[1].projected_point() {
        let hit = lock(&renderer).layer_at(&point).map(str::to_string);
        println!("\n👆 Hit test at ({:.1}, {:.1}): {:?}", point.x, point.y, hit);
    }

    println!("\n✅ Headless example completed successfully!");
    Ok(())
}

fn draw(renderer: &SharedRenderer, markers: &[TriangleMarker]) {
    let mut renderer = lock(renderer);
    renderer.draw_layers(markers.iter().map(|marker| marker as &dyn CanvasPath));
    println!(
        "   🖌️ draw pass recorded {} canvas commands",
        renderer.context().commands().len()
    );
    for marker in markers {
        println!(
            "   {} drawn={} bounds={:?}",
            marker.layer_id(),
            renderer.is_drawn(marker.layer_id()),
            marker.pixel_bounds()
        );
    }
}
