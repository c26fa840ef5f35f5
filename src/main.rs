// Flying geese quilt viewer.
// Draws the quilt over a live backdrop. Tap a triangle to select it, tap the
// backdrop to paint the selection with the color under the tap.
//
// Keys: Space toggles block/quilt view, F3 toggles the status panel, Esc quits.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::{
    event::{Event as WinitEvent, WindowEvent, ElementState, KeyEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use flying_geese::Quilt;
use flying_geese::engine::debug_overlay::{DebugOverlay, DebugStats, TriangleOutline};
use flying_geese::engine::gpu::{self, QuiltVertex, Uniforms};
use flying_geese::engine::{InputState, LiveBackdrop, QuiltSession, TapDebounce, ViewerConfig};

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,

    quilt_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    num_vertices: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    backdrop_pipeline: wgpu::RenderPipeline,
    backdrop_texture: wgpu::Texture,
    backdrop_bind_group: wgpu::BindGroup,
    backdrop: LiveBackdrop,

    session: QuiltSession,
    input: InputState,
    debounce: TapDebounce,
    overlay: DebugOverlay,
    toggle_requested: bool,

    last_update: Instant,
    fps: u32,
}

impl State {
    async fn new(window: Arc<Window>, viewer: &ViewerConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .context("requesting GPU device")?;

        // Sampled colors are stored as raw 8-bit values, so render without an
        // sRGB conversion to keep painted triangles matching the backdrop.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        // ---- Quilt pipeline ------------------------------------------------

        let quilt_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quilt Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("quilt.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[Uniforms::new(glam::Mat4::IDENTITY)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let quilt_pipeline = create_pipeline(
            &device,
            "Quilt Pipeline",
            &uniform_bind_group_layout,
            &quilt_shader,
            &[QuiltVertex::desc()],
            config.format,
        );

        // ---- Backdrop pipeline ---------------------------------------------

        let (bw, bh) = viewer.backdrop_size;
        let backdrop = LiveBackdrop::new(bw.max(1), bh.max(1));
        let backdrop_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Backdrop Texture"),
            size: backdrop_extent(&backdrop),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let backdrop_view = backdrop_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let backdrop_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Backdrop Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let backdrop_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some("backdrop_bind_group_layout"),
            });

        let backdrop_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &backdrop_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&backdrop_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&backdrop_sampler),
                },
            ],
            label: Some("backdrop_bind_group"),
        });

        let backdrop_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Backdrop Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("backdrop.wgsl").into()),
        });

        let backdrop_pipeline = create_pipeline(
            &device,
            "Backdrop Pipeline",
            &backdrop_bind_group_layout,
            &backdrop_shader,
            &[],
            config.format,
        );

        // ---- Quilt ---------------------------------------------------------

        let quilt = match viewer.seed {
            Some(seed) => Quilt::seeded(seed),
            None => Quilt::new(),
        };
        let session = QuiltSession::new(viewer, quilt).context("drawing the initial quilt block")?;

        let vertices = gpu::pack_quilt(&session.quilt().mesh());
        let vertex_buffer = create_vertex_buffer(&device, &vertices);

        let overlay = DebugOverlay::new(&window, &device, config.format);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            quilt_pipeline,
            vertex_buffer,
            vertex_capacity: vertices.len(),
            num_vertices: vertices.len() as u32,
            uniform_buffer,
            uniform_bind_group,
            backdrop_pipeline,
            backdrop_texture,
            backdrop_bind_group,
            backdrop,
            session,
            input: InputState::new((size.width, size.height)),
            debounce: TapDebounce::new(viewer.tap_debounce_frames),
            overlay,
            toggle_requested: false,
            last_update: Instant::now(),
            fps: 0,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Route a window event: the overlay sees it first, and anything it
    /// consumed (button presses, panel clicks) never reaches the quilt.
    fn handle_window_event(&mut self, event: &WindowEvent) {
        let response = self.overlay.handle_window_event(&self.window, event);
        if response.consumed {
            return;
        }
        self.input.process_event(event);
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_update).as_secs_f32();
        self.last_update = now;

        self.backdrop.advance(dt);

        if self.input.was_key_pressed(KeyCode::F3) {
            self.overlay.toggle();
        }
        if self.input.was_key_pressed(KeyCode::Space) {
            self.toggle_requested = true;
        }
        if std::mem::take(&mut self.toggle_requested) {
            if let Err(e) = self.session.toggle_view() {
                log::error!("view toggle failed: {e}");
            }
        }

        if let Some(tap) = self.debounce.filter(self.input.tap()) {
            match self.session.handle_tap(tap, self.input.window_size, &self.backdrop) {
                Ok(outcome) => log::debug!("tap at {tap}: {outcome:?}"),
                Err(e) => log::error!("tap at {tap} rejected: {e}"),
            }
        }

        self.input.end_frame();

        if self.session.take_mesh_dirty() {
            self.upload_quilt();
        }
    }

    /// Push the current mesh to the GPU, growing the buffer when needed.
    fn upload_quilt(&mut self) {
        let vertices = gpu::pack_quilt(&self.session.quilt().mesh());
        if vertices.len() > self.vertex_capacity {
            self.vertex_buffer = create_vertex_buffer(&self.device, &vertices);
            self.vertex_capacity = vertices.len();
        } else {
            self.queue.write_buffer(&self.vertex_buffer, 0, gpu::vertex_bytes(&vertices));
        }
        self.num_vertices = vertices.len() as u32;
    }

    fn outline(&self) -> Option<TriangleOutline> {
        let window_size = (self.size.width, self.size.height);
        let points_per_pixel = 1.0 / self.window.scale_factor() as f32;
        let corners = self.session.outline()?.map(|p| {
            let px = self.session.camera.world_to_screen(p, window_size) * points_per_pixel;
            egui::pos2(px.x, px.y)
        });
        Some(TriangleOutline { corners })
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Write backdrop + camera BEFORE creating the render pass
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.backdrop_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            self.backdrop.rgba_bytes(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * backdrop_extent(&self.backdrop).width),
                rows_per_image: Some(backdrop_extent(&self.backdrop).height),
            },
            backdrop_extent(&self.backdrop),
        );

        let aspect = self.size.width as f32 / self.size.height.max(1) as f32;
        let uniforms = Uniforms::new(self.session.camera.view_projection(aspect));
        self.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.backdrop_pipeline);
            render_pass.set_bind_group(0, &self.backdrop_bind_group, &[]);
            render_pass.draw(0..3, 0..1);

            render_pass.set_pipeline(&self.quilt_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.num_vertices, 0..1);
        }

        let quilt = self.session.quilt();
        let stats = DebugStats {
            fps: self.fps,
            view_label: self.session.view().label(),
            hit_index: self.session.last_hit(),
            selected_triangle: self.session.selected(),
            triangle_count: quilt.triangle_count(),
            last_sample: self.session.last_sample().map(|c| c.to_rgb8()),
        };
        let outline = self.outline();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let response = self.overlay.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &self.window,
            &view,
            &screen_descriptor,
            &stats,
            outline.as_ref(),
        );
        if response.toggle_view {
            self.toggle_requested = true;
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

// ============================================================================
// GPU HELPERS
// ============================================================================

fn backdrop_extent(backdrop: &LiveBackdrop) -> wgpu::Extent3d {
    use flying_geese::engine::ImageSource;
    let (width, height) = backdrop.dimensions();
    wgpu::Extent3d { width, height, depth_or_array_layers: 1 }
}

fn create_vertex_buffer(device: &wgpu::Device, vertices: &[QuiltVertex]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Quilt Vertex Buffer"),
        contents: gpu::vertex_bytes(vertices),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // The quilt is authored with mixed winding; draw both sides.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let viewer = ViewerConfig::from_env();

    let event_loop = EventLoop::new().context("creating event loop")?;

    let window_attributes = Window::default_attributes()
        .with_title("Flying Geese - tap a triangle, then tap the backdrop to paint it")
        .with_inner_size(winit::dpi::LogicalSize::new(viewer.window_size.0, viewer.window_size.1));

    #[allow(deprecated)]
    let window = Arc::new(
        event_loop
            .create_window(window_attributes)
            .context("creating window")?,
    );

    let mut state = pollster::block_on(State::new(window.clone(), &viewer))?;
    log::info!("quilt viewer started in block view");

    let mut frame_count = 0;
    let mut last_fps_update = Instant::now();

    #[allow(deprecated)]
    event_loop.run(move |event, control_flow| {
        match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            ..
                        },
                    ..
                } => control_flow.exit(),
                WindowEvent::Resized(physical_size) => {
                    state.resize(*physical_size);
                    state.handle_window_event(event);
                }
                WindowEvent::RedrawRequested => {
                    state.update();
                    match state.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory, exiting");
                            control_flow.exit();
                        }
                        Err(e) => log::warn!("surface error: {e:?}"),
                    }

                    frame_count += 1;
                    let now = Instant::now();
                    if (now - last_fps_update).as_secs_f32() >= 1.0 {
                        state.fps = frame_count;
                        log::debug!("FPS: {} | Triangles: {}", frame_count, state.session.quilt().triangle_count());
                        frame_count = 0;
                        last_fps_update = now;
                    }
                }
                other => state.handle_window_event(other),
            },
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
