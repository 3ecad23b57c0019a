//! wgpu compute backend.
//!
//! Runs the grid launch on a real GPU. The tile becomes the shader's
//! workgroup size and the launch grid becomes the dispatch size. WGSL has no
//! portable f64, so operands are narrowed to f32 on upload and the result is
//! widened back on read-out.

use log::{debug, info};

use super::LaunchConfig;
use crate::backend::MatmulBackend;
use crate::error::{MatrixError, Result};
use crate::kernel;

/// Largest tile whose tile*tile threads fit the default per-workgroup
/// invocation limit (256).
pub const MAX_TILE: usize = 16;

const F32_BYTES: u64 = std::mem::size_of::<f32>() as u64;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Dimensions {
    m: u32,
    k: u32,
    n: u32,
    _padding: u32,
}

/// One thread per output element. `global_id.x` is the column, `global_id.y`
/// the row, matching [`LaunchConfig`].
fn matmul_shader(tile: usize) -> String {
    format!(
        r#"
@group(0) @binding(0) var<storage, read> a: array<f32>;
@group(0) @binding(1) var<storage, read> b: array<f32>;
@group(0) @binding(2) var<storage, read_write> c: array<f32>;

struct Dimensions {{
    M: u32,
    K: u32,
    N: u32,
    _padding: u32,
}}

@group(0) @binding(3) var<uniform> dims: Dimensions;

@compute @workgroup_size({tile}, {tile})
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {{
    let col = global_id.x;
    let row = global_id.y;

    var sum: f32 = 0.0;
    for (var t: u32 = 0u; t < dims.K; t = t + 1u) {{
        sum = sum + a[row * dims.K + t] * b[t * dims.N + col];
    }}

    c[row * dims.N + col] = sum;
}}
"#,
        tile = tile
    )
}

/// Check a launch against the device limits before any buffer is created.
///
/// Returns the uniform block for the shader.
fn check_limits(
    limits: &wgpu::Limits,
    launch: &LaunchConfig,
    m: usize,
    k: usize,
    n: usize,
) -> Result<Dimensions> {
    let to_u32 = |what: &str, v: usize| {
        u32::try_from(v)
            .map_err(|_| MatrixError::Device(format!("{} {} does not fit in u32", what, v)))
    };
    let dims = Dimensions {
        m: to_u32("row count", m)?,
        k: to_u32("inner dimension", k)?,
        n: to_u32("column count", n)?,
        _padding: 0,
    };

    let max_groups = limits.max_compute_workgroups_per_dimension as usize;
    if launch.grid.0 > max_groups || launch.grid.1 > max_groups {
        return Err(MatrixError::Device(format!(
            "grid {:?} exceeds {} workgroups per dimension",
            launch.grid, max_groups
        )));
    }

    let binding_limit =
        u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
    let operands = [
        ("a", dims.m, dims.k),
        ("b", dims.k, dims.n),
        ("c", dims.m, dims.n),
    ];
    for (name, rows, cols) in operands {
        let bytes = u64::from(rows) * u64::from(cols) * F32_BYTES;
        if bytes > binding_limit {
            return Err(MatrixError::Device(format!(
                "matrix {} needs {} bytes, device storage binding limit is {}",
                name, bytes, binding_limit
            )));
        }
    }
    Ok(dims)
}

/// GPU backend built on wgpu.
#[derive(Debug)]
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    tile: usize,
}

impl WgpuBackend {
    /// Acquire a GPU adapter and device.
    ///
    /// # Errors
    /// `InvalidTileConfiguration` if `tile` is 0. `Device` if the tile is
    /// above [`MAX_TILE`] or no adapter or device is available.
    pub fn new(tile: usize) -> Result<Self> {
        if tile == 0 {
            return Err(MatrixError::InvalidTileConfiguration {
                rows: 0,
                cols: 0,
                tile,
            });
        }
        if tile > MAX_TILE {
            return Err(MatrixError::Device(format!(
                "tile {} exceeds the workgroup limit of {}x{}",
                tile, MAX_TILE, MAX_TILE
            )));
        }
        pollster::block_on(Self::new_async(tile))
    }

    async fn new_async(tile: usize) -> Result<Self> {
        let instance = wgpu::Instance::default();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| MatrixError::Device("no GPU adapter found".to_string()))?;
        info!("wgpu adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("matbench device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| MatrixError::Device(format!("failed to create device: {}", e)))?;

        Ok(WgpuBackend {
            device,
            queue,
            tile,
        })
    }

    async fn matmul_async(
        &self,
        launch: LaunchConfig,
        dims: Dimensions,
        a: &[f32],
        b: &[f32],
    ) -> Result<Vec<f32>> {
        let out_bytes = u64::from(dims.m) * u64::from(dims.n) * F32_BYTES;

        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("matmul shader"),
                source: wgpu::ShaderSource::Wgsl(matmul_shader(launch.tile()).into()),
            });

        let storage = |label: &str, size: u64, usage: wgpu::BufferUsages| {
            self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage,
                mapped_at_creation: false,
            })
        };
        let input = wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST;
        let a_buffer = storage("matrix a", std::mem::size_of_val(a) as u64, input);
        let b_buffer = storage("matrix b", std::mem::size_of_val(b) as u64, input);
        let c_buffer = storage(
            "matrix c",
            out_bytes,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        );
        let dims_buffer = storage(
            "dimensions",
            std::mem::size_of::<Dimensions>() as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let staging_buffer = storage(
            "staging",
            out_bytes,
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        );

        self.queue.write_buffer(&a_buffer, 0, bytemuck::cast_slice(a));
        self.queue.write_buffer(&b_buffer, 0, bytemuck::cast_slice(b));
        self.queue
            .write_buffer(&dims_buffer, 0, bytemuck::bytes_of(&dims));

        let pipeline = self
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("matmul pipeline"),
                layout: None,
                module: &shader,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("matmul bind group"),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: a_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: b_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: c_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: dims_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("matmul encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("matmul pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(launch.grid.0 as u32, launch.grid.1 as u32, 1);
        }
        encoder.copy_buffer_to_buffer(&c_buffer, 0, &staging_buffer, 0, out_bytes);
        self.queue.submit(Some(encoder.finish()));

        let slice = staging_buffer.slice(..);
        let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).ok();
        });

        // Block until the device has finished every block of the grid.
        self.device.poll(wgpu::Maintain::Wait);

        receiver
            .receive()
            .await
            .ok_or_else(|| MatrixError::Device("buffer mapping was cancelled".to_string()))?
            .map_err(|e| MatrixError::Device(format!("buffer mapping failed: {:?}", e)))?;

        let out = {
            let data = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, f32>(&data).to_vec()
        };
        staging_buffer.unmap();
        Ok(out)
    }
}

impl MatmulBackend for WgpuBackend {
    fn name(&self) -> &str {
        "wgpu"
    }

    fn matmul(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
        kernel::check_operands(a, b, m, k, n)?;
        // No device memory is allocated for a launch that does not tile.
        let launch = LaunchConfig::new(m, n, self.tile)?;
        let dims = check_limits(&self.device.limits(), &launch, m, k, n)?;
        debug!("wgpu: dispatch grid={:?} block={:?}", launch.grid, launch.block);

        let a32: Vec<f32> = a.iter().map(|&v| v as f32).collect();
        let b32: Vec<f32> = b.iter().map(|&v| v as f32).collect();
        let c32 = pollster::block_on(self.matmul_async(launch, dims, &a32, &b32))?;
        Ok(c32.into_iter().map(f64::from).collect())
    }
}
