use egui::epaint::Shadow;

pub struct DebugStats {
    pub fps: u32,
    pub view_label: &'static str,
    /// Triangle index of the last tap that hit the quilt.
    pub hit_index: Option<usize>,
    pub selected_triangle: usize,
    pub triangle_count: usize,
    /// Last color sampled from the backdrop, as 8-bit RGB.
    pub last_sample: Option<[u8; 3]>,
}

/// Selected triangle, already projected to egui screen points.
pub struct TriangleOutline {
    pub corners: [egui::Pos2; 3],
}

/// What the user asked for through the overlay this frame.
#[derive(Default)]
pub struct OverlayResponse {
    pub toggle_view: bool,
}

pub struct DebugOverlay {
    pub visible: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl DebugOverlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // Style: dark, semi-transparent, small monospace white font
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(0, 0, 0, 180);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_visuals(visuals);

        let mut style = (*egui_ctx.style()).clone();
        style.override_font_id = Some(egui::FontId::monospace(13.0));
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // no depth
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            visible: true,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Render one egui frame:
    ///
    /// - `outline`: selected triangle outline (`None` = hidden).
    /// - `stats`: status panel with the view toggle button.
    ///
    /// The toggle button stays reachable when the panel is hidden (F3).
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        stats: &DebugStats,
        outline: Option<&TriangleOutline>,
    ) -> OverlayResponse {
        let raw_input = self.egui_state.take_egui_input(window);
        let mut response = OverlayResponse::default();
        let visible = self.visible;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            // ── Selected triangle outline (background layer, under the panel) ──
            if let Some(outline) = outline {
                let painter = ctx.layer_painter(egui::LayerId::new(
                    egui::Order::Background,
                    egui::Id::new("triangle_outline"),
                ));
                let stroke = egui::Stroke::new(
                    2.0,
                    egui::Color32::from_rgba_unmultiplied(255, 220, 0, 230),
                );
                let [a, b, c] = outline.corners;
                painter.line_segment([a, b], stroke);
                painter.line_segment([b, c], stroke);
                painter.line_segment([c, a], stroke);
            }

            // ── Status panel ────────────────────────────────────────────────
            if visible {
                egui::Area::new(egui::Id::new("debug_overlay"))
                    .fixed_pos(egui::pos2(10.0, 10.0))
                    .show(ctx, |ui| {
                        egui::Frame::none()
                            .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                            .inner_margin(egui::Margin::same(8.0))
                            .rounding(4.0)
                            .show(ui, |ui: &mut egui::Ui| {
                                ui.label(format!("FPS: {}", stats.fps));
                                ui.label(format!(
                                    "View: {}  ({} triangles)",
                                    stats.view_label, stats.triangle_count
                                ));
                                match stats.hit_index {
                                    Some(i) => ui.label(format!("hit index: {i}")),
                                    None => ui.label("hit index: -"),
                                };
                                ui.label(format!("Selected: {}", stats.selected_triangle));
                                ui.horizontal(|ui| {
                                    ui.label("Sample:");
                                    match stats.last_sample {
                                        Some([r, g, b]) => {
                                            let (rect, _) = ui.allocate_exact_size(
                                                egui::vec2(28.0, 14.0),
                                                egui::Sense::hover(),
                                            );
                                            ui.painter().rect_filled(
                                                rect,
                                                2.0,
                                                egui::Color32::from_rgb(r, g, b),
                                            );
                                            ui.label(format!("#{r:02x}{g:02x}{b:02x}"));
                                        }
                                        None => {
                                            ui.label("-");
                                        }
                                    }
                                });
                            });
                    });
            }

            // ── View toggle ─────────────────────────────────────────────────
            egui::Area::new(egui::Id::new("view_toggle"))
                .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -10.0))
                .show(ctx, |ui| {
                    if ui.button("Toggle quilt view").clicked() {
                        response.toggle_view = true;
                    }
                });
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        response
    }
}
