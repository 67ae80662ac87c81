/// Draw passes over several triangle markers sharing one canvas renderer
#[cfg(test)]
mod canvas_renderer_tests {
    use maplet_triangle::prelude::*;

    fn shared_canvas() -> SharedRenderer {
        let _ = env_logger::builder().is_test(true).try_init();
        canvas(RendererOptions::default())
    }

    fn marker_at(renderer: &SharedRenderer, id: &str, lat: f64, lng: f64) -> TriangleMarker {
        TriangleMarker::new(
            LatLng::new(lat, lng),
            TriangleMarkerOptions::default()
                .id(id)
                .renderer(renderer.clone()),
        )
    }

    fn move_count(commands: &[CanvasCommand]) -> usize {
        commands
            .iter()
            .filter(|command| matches!(command, CanvasCommand::MoveTo { .. }))
            .count()
    }

    fn view() -> Viewport {
        Viewport::new(LatLng::new(52.0, 21.0), 8.0, Point::new(800.0, 600.0))
    }

    #[test]
    fn test_update_triangle_outside_a_pass_is_a_no_op() {
        let renderer = shared_canvas();
        let mut marker = marker_at(&renderer, "idle", 52.0, 21.0);
        marker.reproject_and_bound(&view());

        let mut guard = lock(&renderer);
        guard.update_triangle(&marker);
        assert!(guard.context().commands().is_empty());
        assert!(!guard.is_drawn("idle"));
    }

    #[test]
    fn test_full_pass_draws_every_visible_marker() {
        let renderer = shared_canvas();
        let viewport = view();
        lock(&renderer).update_bounds(&viewport);

        let mut near = marker_at(&renderer, "near", 52.0, 21.0);
        let mut also_near = marker_at(&renderer, "also_near", 52.1, 21.1);
        let mut far = marker_at(&renderer, "far", -33.9, 151.2);
        for marker in [&mut near, &mut also_near, &mut far] {
            marker.on_viewport_changed(&viewport).unwrap();
        }
        assert!(far.is_empty());

        let mut guard = lock(&renderer);
        guard.draw_layers([&near as &dyn CanvasPath, &also_near, &far]);

        assert!(guard.is_drawn("near"));
        assert!(guard.is_drawn("also_near"));
        assert!(!guard.is_drawn("far"));
        assert_eq!(move_count(guard.context().commands()), 2);
        assert!(!guard.is_drawing());
    }

    #[test]
    fn test_transform_is_restored_between_markers() {
        let renderer = shared_canvas();
        let viewport = view();

        let mut rotated = marker_at(&renderer, "rotated", 52.0, 21.0);
        rotated.set_rotation(37.0);
        let mut plain = marker_at(&renderer, "plain", 52.0, 21.0);
        rotated.reproject_and_bound(&viewport);
        plain.reproject_and_bound(&viewport);

        let mut guard = lock(&renderer);
        guard.draw_layers([&rotated as &dyn CanvasPath, &plain]);

        let ctx = guard.context();
        assert_eq!(ctx.transform(), Point::identity_matrix());
        assert_eq!(ctx.save_depth(), 0);

        // the unrotated marker's path is the canonical triangle around its point
        let center = plain.projected_point().unwrap();
        let path = ctx.current_path();
        assert!(path[0].distance_to(&Point::new(center.x, center.y - 6.0)) < 1e-9);
        assert!(path[1].distance_to(&Point::new(center.x + 6.0, center.y + 12.0)) < 1e-9);
    }

    #[test]
    fn test_fill_and_stroke_follow_the_marker_style() {
        let renderer = shared_canvas();
        let mut marker = marker_at(&renderer, "styled", 52.0, 21.0);
        marker.set_style(&PathOptions::new().color("red").fill_opacity(0.4));
        marker.reproject_and_bound(&view());

        let mut guard = lock(&renderer);
        guard.draw_layers([&marker as &dyn CanvasPath]);
        let commands = guard.context().commands();

        let close = commands
            .iter()
            .position(|command| *command == CanvasCommand::ClosePath)
            .unwrap();
        let restore = commands
            .iter()
            .rposition(|command| *command == CanvasCommand::Restore)
            .unwrap();
        let fill = commands
            .iter()
            .position(|command| matches!(command, CanvasCommand::Fill(_)))
            .unwrap();
        assert!(close < restore && restore < fill);

        assert!(commands.contains(&CanvasCommand::SetGlobalAlpha(0.4)));
        assert!(commands.contains(&CanvasCommand::SetFillStyle("red".to_string())));
        assert!(commands.contains(&CanvasCommand::SetStrokeStyle("red".to_string())));
        assert_eq!(commands.last(), Some(&CanvasCommand::Stroke));
    }

    #[test]
    fn test_partial_pass_only_redraws_dirty_markers() {
        let renderer = shared_canvas();
        let viewport = view();

        let mut left = marker_at(&renderer, "left", 52.0, 20.0);
        let mut right = marker_at(&renderer, "right", 52.0, 22.0);
        left.reproject_and_bound(&viewport);
        right.reproject_and_bound(&viewport);

        lock(&renderer).draw_layers([&left as &dyn CanvasPath, &right]);

        right.set_rotation(180.0);
        let area = lock(&renderer).redraw_area().cloned().unwrap();
        assert!(area.intersects(right.pixel_bounds().unwrap()));
        assert!(!area.intersects(left.pixel_bounds().unwrap()));

        let mut guard = lock(&renderer);
        guard.draw_layers([&left as &dyn CanvasPath, &right]);

        let new_commands = guard.context().commands();
        assert_eq!(new_commands[0], CanvasCommand::ClearRect(area));
        assert_eq!(move_count(new_commands), 1);
        assert!(new_commands.iter().any(|command| matches!(
            command,
            CanvasCommand::Rotate { angle } if (angle - std::f64::consts::PI).abs() < 1e-12
        )));
        assert!(!guard.needs_redraw());
    }

    #[test]
    fn test_unprojected_request_forces_full_redraw() {
        let renderer = shared_canvas();
        let mut marker = marker_at(&renderer, "fresh", 52.0, 21.0);
        marker.set_width(30.0);

        assert!(lock(&renderer).needs_redraw());
        assert_eq!(lock(&renderer).redraw_area(), None);
    }

    #[test]
    fn test_hit_testing_uses_bounding_boxes() {
        let renderer = shared_canvas();
        let viewport = view();

        let mut below = marker_at(&renderer, "below", 52.0, 21.0);
        let mut above = marker_at(&renderer, "above", 52.0, 21.0);
        above.set_style(&PathOptions::new().interactive(true));
        below.reproject_and_bound(&viewport);
        above.reproject_and_bound(&viewport);

        lock(&renderer).draw_layers([&below as &dyn CanvasPath, &above]);

        let center = above.projected_point().unwrap();
        // inside the box but outside the triangle's silhouette
        let corner = Point::new(center.x - 6.0, center.y - 6.0);
        assert!(above.contains_point(&corner));
        assert_eq!(lock(&renderer).layer_at(&corner), Some("above"));
        assert_eq!(
            lock(&renderer).layer_at(&Point::new(center.x + 100.0, center.y)),
            None
        );

        assert!(above.remove_from_renderer());
        assert_eq!(lock(&renderer).layer_at(&corner), Some("below"));
    }

    #[test]
    fn test_non_interactive_markers_are_not_hit() {
        let renderer = shared_canvas();
        let mut marker = marker_at(&renderer, "decor", 52.0, 21.0);
        marker.set_options(serde_json::json!({"interactive": false})).unwrap();
        marker.reproject_and_bound(&view());

        lock(&renderer).draw_layers([&marker as &dyn CanvasPath]);
        let center = marker.projected_point().unwrap();

        assert!(lock(&renderer).is_drawn("decor"));
        assert_eq!(lock(&renderer).layer_at(&center), None);
    }

    #[test]
    fn test_moved_marker_is_redrawn_at_its_new_place() {
        let renderer = shared_canvas();
        let viewport = view();

        let mut marker = marker_at(&renderer, "mover", 52.0, 21.0);
        marker.reproject_and_bound(&viewport);
        lock(&renderer).draw_layers([&marker as &dyn CanvasPath]);
        let old_bounds = marker.pixel_bounds().cloned().unwrap();

        marker.set_position((52.0, 21.5)).unwrap();
        marker.reproject_and_bound(&viewport);
        let new_bounds = marker.pixel_bounds().cloned().unwrap();
        assert!(!new_bounds.intersects(&old_bounds));

        let mut guard = lock(&renderer);
        guard.draw_layers([&marker as &dyn CanvasPath]);

        let commands = guard.context().commands();
        let CanvasCommand::ClearRect(cleared) = &commands[0] else {
            panic!("partial pass should start by clearing, got {:?}", commands[0]);
        };
        assert!(cleared.intersects(&old_bounds) && cleared.intersects(&new_bounds));
        assert_eq!(move_count(commands), 1);

        let drawn = guard.drawn_layer("mover").unwrap();
        assert_eq!(drawn.pixel_bounds, new_bounds);
        let center = marker.projected_point().unwrap();
        assert_eq!(guard.layer_at(&center), Some("mover"));
        assert_eq!(guard.layer_at(&old_bounds.center()), None);
    }

    #[test]
    fn test_grown_marker_is_redrawn_over_its_larger_area() {
        let renderer = shared_canvas();
        let viewport = view();

        let mut marker = marker_at(&renderer, "grower", 52.0, 21.0);
        marker.reproject_and_bound(&viewport);
        lock(&renderer).draw_layers([&marker as &dyn CanvasPath]);

        marker.set_width(80.0).set_height(60.0);
        marker.reproject_and_bound(&viewport);
        let grown = marker.pixel_bounds().cloned().unwrap();

        let area = lock(&renderer).redraw_area().cloned().unwrap();
        assert!(area.contains(&grown.min) && area.contains(&grown.max));

        let mut guard = lock(&renderer);
        guard.draw_layers([&marker as &dyn CanvasPath]);
        assert_eq!(move_count(guard.context().commands()), 1);
        assert_eq!(guard.drawn_layer("grower").unwrap().pixel_bounds, grown);

        let center = marker.projected_point().unwrap();
        let path = guard.context().current_path();
        assert!(path[1].distance_to(&Point::new(center.x + 40.0, center.y + 60.0)) < 1e-9);
    }

    #[test]
    fn test_marker_moved_off_screen_is_forgotten() {
        let renderer = shared_canvas();
        let viewport = view();
        lock(&renderer).update_bounds(&viewport);

        let mut marker = marker_at(&renderer, "leaver", 52.0, 21.0);
        marker.reproject_and_bound(&viewport);
        lock(&renderer).draw_layers([&marker as &dyn CanvasPath]);
        assert!(lock(&renderer).is_drawn("leaver"));

        marker.set_position((-33.9, 151.2)).unwrap();
        marker.reproject_and_bound(&viewport);
        lock(&renderer).draw_layers([&marker as &dyn CanvasPath]);

        assert!(!lock(&renderer).is_drawn("leaver"));
    }

    #[test]
    fn test_display_list_holds_only_the_last_pass() {
        let renderer = shared_canvas();
        let mut marker = marker_at(&renderer, "spinner", 52.0, 21.0);
        marker.reproject_and_bound(&view());

        let mut lengths = Vec::new();
        for step in 0..1000 {
            marker.set_rotation(step as f64 + 0.5);
            let mut guard = lock(&renderer);
            guard.draw_layers([&marker as &dyn CanvasPath]);
            lengths.push(guard.context().commands().len());
        }

        assert!(lengths.iter().all(|len| *len == lengths[0]));
        assert!(lengths[0] < 32);
        assert_eq!(move_count(lock(&renderer).context().commands()), 1);
    }
}
