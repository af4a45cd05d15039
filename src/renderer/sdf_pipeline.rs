//! SDF-based WebGPU render pipeline
//!
//! Raymarches the whole scene (road, vehicle, obstacles, trees) in a
//! fragment shader. All entity data goes through uniform buffers so the
//! pipeline also runs on the WebGL2 fallback.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::consts::{MAX_DRAWN_OBSTACLES, VEHICLE_REST_Y};
use crate::settings::Settings;
use crate::sim::GameState;

/// Obstacle slots in the shader
pub const MAX_GPU_OBSTACLES: usize = MAX_DRAWN_OBSTACLES;
/// Tree slots in the shader
pub const MAX_GPU_TREES: usize = 128;
/// Camera eye z in the shader; anything behind it is off screen
pub const CAMERA_Z: f32 = -10.0;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub resolution: [f32; 2], // offset 0
    pub time: f32,            // offset 8
    pub road_width: f32,      // offset 12
    pub road_length: f32,     // offset 16
    pub obstacle_count: u32,  // offset 20
    pub tree_count: u32,      // offset 24
    pub fog_enabled: u32,     // offset 28
    pub shadows_enabled: u32, // offset 32
    pub _pad: [u32; 3],       // pad to 48 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct VehicleUniform {
    pub position: [f32; 3],
    pub rotation_z: f32,
    pub pitch_x: f32,
    pub _pad: [f32; 3],
}

/// xyz = world position, w = lane (obstacles) or unused (trees)
pub type EntitySlot = [f32; 4];

/// Everything uploaded for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePacket {
    pub globals: Globals,
    pub vehicle: VehicleUniform,
    pub obstacles: [EntitySlot; MAX_GPU_OBSTACLES],
    pub trees: Vec<EntitySlot>,
}

/// Build the GPU view of the current game state
///
/// Only trees between the camera and the far end of the road are sent. The
/// nearest ones win when there are more than the preset allows.
pub fn pack_scene(
    state: &GameState,
    settings: &Settings,
    resolution: (u32, u32),
    elapsed: f32,
) -> ScenePacket {
    let tuning = &state.tuning;
    let vehicle = &state.vehicle;

    let mut body = vehicle.position();
    body.y = settings.effective_bob(body.y, VEHICLE_REST_Y);
    let pitch = if settings.reduced_motion { 0.0 } else { vehicle.pitch_x };

    let mut obstacles = [[0.0; 4]; MAX_GPU_OBSTACLES];
    let obstacle_count = state.obstacles.len().min(MAX_GPU_OBSTACLES);
    for (slot, obstacle) in obstacles.iter_mut().zip(&state.obstacles) {
        let pos = Vec3::new(obstacle.position_x(tuning), 0.75, obstacle.position_z);
        *slot = [pos.x, pos.y, pos.z, obstacle.lane as f32];
    }

    let mut visible: Vec<_> = state
        .trees
        .iter()
        .filter(|t| (CAMERA_Z..=tuning.road_length).contains(&t.position_z))
        .collect();
    visible.sort_unstable_by(|a, b| a.position_z.total_cmp(&b.position_z));
    let tree_cap = settings.max_trees().min(MAX_GPU_TREES);
    let mut trees = vec![[0.0; 4]; MAX_GPU_TREES];
    let tree_count = visible.len().min(tree_cap);
    for (slot, tree) in trees.iter_mut().zip(visible.iter().take(tree_cap)) {
        *slot = [tree.offset_x, 0.0, tree.position_z, 0.0];
    }

    ScenePacket {
        globals: Globals {
            resolution: [resolution.0 as f32, resolution.1 as f32],
            time: elapsed,
            road_width: tuning.road_width,
            road_length: tuning.road_length,
            obstacle_count: obstacle_count as u32,
            tree_count: tree_count as u32,
            fog_enabled: settings.quality.fog_enabled() as u32,
            shadows_enabled: settings.quality.shadows_enabled() as u32,
            _pad: [0; 3],
        },
        vehicle: VehicleUniform {
            position: body.to_array(),
            rotation_z: settings.effective_tilt(vehicle.rotation_z),
            pitch_x: pitch,
            _pad: [0.0; 3],
        },
        obstacles,
        trees,
    }
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    vehicle_buffer: wgpu::Buffer,
    obstacles_buffer: wgpu::Buffer,
    trees_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    start_time: f64,
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let vehicle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vehicle"),
            contents: bytemuck::bytes_of(&VehicleUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let obstacles_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("obstacles"),
            size: (std::mem::size_of::<EntitySlot>() * MAX_GPU_OBSTACLES) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let trees_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trees"),
            size: (std::mem::size_of::<EntitySlot>() * MAX_GPU_TREES) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                uniform_entry(0),
                uniform_entry(1),
                uniform_entry(2),
                uniform_entry(3),
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: vehicle_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: obstacles_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: trees_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            vehicle_buffer,
            obstacles_buffer,
            trees_buffer,
            bind_group,
            size: (width, height),
            start_time: 0.0,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Update GPU buffers from game state and render
    pub fn render(
        &mut self,
        state: &GameState,
        settings: &Settings,
        time: f64,
    ) -> Result<(), wgpu::SurfaceError> {
        // time is ms from requestAnimationFrame
        let elapsed = ((time - self.start_time).max(0.0) / 1000.0) as f32;
        let packet = pack_scene(state, settings, self.size, elapsed);

        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&packet.globals));
        self.queue
            .write_buffer(&self.vehicle_buffer, 0, bytemuck::bytes_of(&packet.vehicle));
        self.queue.write_buffer(
            &self.obstacles_buffer,
            0,
            bytemuck::cast_slice(&packet.obstacles),
        );
        self.queue
            .write_buffer(&self.trees_buffer, 0, bytemuck::cast_slice(&packet.trees));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::spawn::{spawn_obstacle, spawn_tree};
    use crate::tuning::Tuning;

    #[test]
    fn test_uniform_layout_sizes() {
        assert_eq!(std::mem::size_of::<Globals>(), 48);
        assert_eq!(std::mem::size_of::<VehicleUniform>(), 32);
        assert_eq!(std::mem::size_of::<EntitySlot>(), 16);
    }

    #[test]
    fn test_pack_obstacles_at_lane_offsets() {
        let mut state = GameState::new(1);
        spawn_obstacle(&mut state, 0);
        spawn_obstacle(&mut state, 2);

        let packet = pack_scene(&state, &Settings::default(), (800, 600), 0.0);
        assert_eq!(packet.globals.obstacle_count, 2);
        assert_eq!(packet.obstacles[0], [5.0, 0.75, 300.0, 0.0]);
        assert_eq!(packet.obstacles[1], [-5.0, 0.75, 300.0, 2.0]);
        assert_eq!(packet.obstacles[2], [0.0; 4]);
    }

    #[test]
    fn test_tree_cap_keeps_nearest() {
        let mut state = GameState::new(2);
        state.trees.clear();
        for i in 0..100 {
            spawn_tree(&mut state, 250.0 - i as f32);
        }

        let settings = Settings::from_preset(QualityPreset::Low);
        let packet = pack_scene(&state, &settings, (800, 600), 0.0);
        assert_eq!(packet.globals.tree_count, 32);
        assert_eq!(packet.trees.len(), MAX_GPU_TREES);
        assert_eq!(packet.trees[0][2], 151.0);
        assert!(packet.trees[..32].windows(2).all(|w| w[0][2] <= w[1][2]));
        assert_eq!(packet.globals.fog_enabled, 0);
    }

    #[test]
    fn test_trees_behind_camera_are_skipped() {
        let mut state = GameState::new(4);
        state.trees.clear();
        // Culled only at -20, but already behind the eye
        for i in 0..40 {
            spawn_tree(&mut state, -19.0 + i as f32 * 0.2);
        }
        for i in 0..40 {
            spawn_tree(&mut state, 20.0 + i as f32);
        }

        let settings = Settings::from_preset(QualityPreset::Low);
        let packet = pack_scene(&state, &settings, (800, 600), 0.0);
        assert_eq!(packet.globals.tree_count, 32);
        assert!(packet.trees[..32].iter().all(|t| t[2] >= CAMERA_Z));
        assert_eq!(packet.trees[0][2], 20.0);
    }

    #[test]
    fn test_full_obstacle_cap_is_drawn() {
        let tuning = Tuning { max_obstacles: MAX_DRAWN_OBSTACLES, ..Default::default() };
        assert!(tuning.validate().is_ok());
        let mut state = GameState::with_tuning(5, tuning);
        for i in 0..MAX_DRAWN_OBSTACLES {
            spawn_obstacle(&mut state, (i % 3) as u8);
        }

        let packet = pack_scene(&state, &Settings::default(), (800, 600), 0.0);
        assert_eq!(packet.globals.obstacle_count as usize, state.obstacles.len());
    }

    #[test]
    fn test_reduced_motion_flattens_vehicle() {
        let mut state = GameState::new(3);
        state.vehicle.bob_y = 1.04;
        state.vehicle.rotation_z = 0.1;
        state.vehicle.pitch_x = 0.01;

        let settings = Settings { reduced_motion: true, ..Settings::default() };
        let packet = pack_scene(&state, &settings, (800, 600), 0.0);
        assert_eq!(packet.vehicle.position, [0.0, VEHICLE_REST_Y, 0.0]);
        assert_eq!(packet.vehicle.rotation_z, 0.0);
        assert_eq!(packet.vehicle.pitch_x, 0.0);
    }
}
