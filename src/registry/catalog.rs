//! Built-in catalog of the P3ARSEC suite: macro flags, file lists and
//! correspondence rules for every benchmark and parallel variant.

use super::{BenchmarkSpec, Category, Registry, Variant};
use crate::correspondence::Rule;
use crate::error::MetricsError;

const BODYTRACK_PTHREADS_FILES: [&str; 32] = [
    "TrackingBenchmark/main.cpp",
    "TrackingBenchmark/ParticleFilterPthread.h",
    "TrackingBenchmark/TrackingModelPthread.h",
    "TrackingBenchmark/TrackingModelPthread.cpp",
    "TrackingBenchmark/WorkPoolPthread.h",
    "TrackingBenchmark/AsyncIO.h",
    "TrackingBenchmark/threads/Thread.h",
    "TrackingBenchmark/threads/Mutex.cpp",
    "TrackingBenchmark/threads/Mutex.h",
    "TrackingBenchmark/threads/Barrier.cpp",
    "TrackingBenchmark/threads/WorkerGroup.cpp",
    "TrackingBenchmark/threads/SynchQueue.h",
    "TrackingBenchmark/threads/Condition.cpp",
    "TrackingBenchmark/threads/atomic/sparc/cpufunc.h",
    "TrackingBenchmark/threads/atomic/sparc/asi.h",
    "TrackingBenchmark/threads/atomic/sparc/atomic.h",
    "TrackingBenchmark/threads/atomic/atomic.h",
    "TrackingBenchmark/threads/atomic/powerpc/cpufunc.h",
    "TrackingBenchmark/threads/atomic/powerpc/atomic.h",
    "TrackingBenchmark/threads/atomic/i386/atomic.h",
    "TrackingBenchmark/threads/atomic/amd64/atomic.h",
    "TrackingBenchmark/threads/atomic/ia64/atomic.h",
    "TrackingBenchmark/threads/Thread.cpp",
    "TrackingBenchmark/threads/RWLock.h",
    "TrackingBenchmark/threads/Condition.h",
    "TrackingBenchmark/threads/ThreadGroup.cpp",
    "TrackingBenchmark/threads/WorkerGroup.h",
    "TrackingBenchmark/threads/TicketDispenser.h",
    "TrackingBenchmark/threads/LockTypes.h",
    "TrackingBenchmark/threads/RWLock.cpp",
    "TrackingBenchmark/threads/ThreadGroup.h",
    "TrackingBenchmark/threads/Barrier.h",
];

/// Files shared by the serial and FastFlow facesim variants.
const FACESIM_FILES: [&str; 7] = [
    "Benchmarks/facesim/FACE_EXAMPLE.h",
    "Public_Library/Arrays/ARRAY_PARALLEL_OPERATIONS.cpp",
    "Public_Library/Deformable_Objects/DEFORMABLE_OBJECT.cpp",
    "Public_Library/Forces_And_Torques/DIAGONALIZED_FINITE_VOLUME_3D.cpp",
    "Public_Library/Collisions_And_Interactions/COLLISION_PENALTY_FORCES.h",
    "Public_Library/Deformable_Objects/DEFORMABLE_OBJECT_3D.cpp",
    "Public_Library/Deformable_Objects/DEFORMABLE_OBJECT.cpp",
];

const FACESIM_PTHREADS_FILES: [&str; 9] = [
    "Benchmarks/facesim/FACE_EXAMPLE.h",
    "Public_Library/Arrays/ARRAY_PARALLEL_OPERATIONS.cpp",
    "Public_Library/Deformable_Objects/DEFORMABLE_OBJECT.cpp",
    "Public_Library/Forces_And_Torques/DIAGONALIZED_FINITE_VOLUME_3D.cpp",
    "Public_Library/Thread_Utilities/THREAD_POOL.cpp",
    "Public_Library/Thread_Utilities/THREAD_POOL.h",
    "Public_Library/Collisions_And_Interactions/COLLISION_PENALTY_FORCES.h",
    "Public_Library/Deformable_Objects/DEFORMABLE_OBJECT_3D.cpp",
    "Public_Library/Deformable_Objects/DEFORMABLE_OBJECT.cpp",
];

const FACESIM_OMPSS_FILES: [&str; 8] = [
    "Benchmarks/facesim/OMPSS_FACE_EXAMPLE.h",
    "Public_Library/Arrays/OMPSS_ARRAY_PARALLEL_OPERATIONS.cpp",
    "Public_Library/Deformable_Objects/OMPSS_DEFORMABLE_OBJECT.cpp",
    "Public_Library/Forces_And_Torques/OMPSS_DIAGONALIZED_FINITE_VOLUME_3D.cpp",
    "Public_Library/Collisions_And_Interactions/OMPSS_COLLISION_PENALTY_FORCES.cpp",
    "Public_Library/Collisions_And_Interactions/COLLISION_PENALTY_FORCES.h",
    "Public_Library/Deformable_Objects/OMPSS_DEFORMABLE_OBJECT_3D.cpp",
    "Public_Library/Deformable_Objects/OMPSS_DEFORMABLE_OBJECT.cpp",
];

fn tracking(suffix: &str) -> [String; 4] {
    [
        "TrackingBenchmark/main.cpp".to_string(),
        format!("TrackingBenchmark/ParticleFilter{}.h", suffix),
        format!("TrackingBenchmark/TrackingModel{}.h", suffix),
        format!("TrackingBenchmark/TrackingModel{}.cpp", suffix),
    ]
}

pub(super) fn parsec() -> Result<Registry, MetricsError> {
    use Variant::*;

    Registry::builder()
        .benchmark(
            BenchmarkSpec::new("blackscholes", Category::Application)
                .variant(Serial, "", ["blackscholes.c"])
                .variant(Pthreads, "-DENABLE_THREADS", ["blackscholes.c"])
                .variant(FastFlow, "-DENABLE_FF", ["blackscholes.c"])
                .variant(OpenMp, "-DENABLE_OPENMP", ["blackscholes.c"])
                .variant(Tbb, "-DENABLE_TBB", ["blackscholes.c"])
                .variant(OmpSs, "", ["blackscholes-ompss.c"])
                .variant(SkePU, "", ["blackscholes_skepu.cpp"])
                .rule(Rule::rename(Some(OmpSs), "blackscholes-ompss.c", "blackscholes.c"))
                .rule(Rule::substitute(Some(SkePU), "_skepu.cpp", ".c")),
        )
        .benchmark(
            BenchmarkSpec::new("bodytrack", Category::Application)
                .variant(Serial, "", tracking(""))
                .variant(Pthreads, "-DUSE_THREADS=1 -DHAVE_LIBPTHREAD", BODYTRACK_PTHREADS_FILES)
                .variant(FastFlow, "-DUSE_FF=1", tracking("FF"))
                .variant(OpenMp, "-DUSE_OPENMP=1", tracking("OMP"))
                .variant(Tbb, "-DUSE_TBB=1", tracking("TBB"))
                .variant(OmpSs, "-DUSE_OMPSS=1", tracking("OMPSS"))
                .rule(Rule::rename(
                    None,
                    "ParticleFilter",
                    "TrackingBenchmark/ParticleFilter.h",
                ))
                .rule(Rule::role(
                    "TrackingModel",
                    "TrackingBenchmark/TrackingModel.h",
                    "TrackingBenchmark/TrackingModel.cpp",
                )),
        )
        .benchmark(
            BenchmarkSpec::new("canneal", Category::Kernel)
                .variant(Serial, "", ["main.cpp", "annealer_thread.h", "annealer_thread.cpp"])
                .variant(
                    Pthreads,
                    "-DENABLE_THREADS",
                    ["main.cpp", "annealer_thread.h", "annealer_thread.cpp"],
                )
                .variant(
                    FastFlow,
                    "-DENABLE_THREADS -DENABLE_FF",
                    ["main.cpp", "annealer_thread_ff.h", "annealer_thread_ff.cpp"],
                )
                .variant(
                    OmpSs,
                    "-DENABLE_OMPSS",
                    ["main.cpp", "annealer_thread.h", "annealer_thread.cpp"],
                )
                .rule(Rule::rename(Some(FastFlow), "annealer_thread_ff.h", "annealer_thread.h"))
                .rule(Rule::rename(
                    Some(FastFlow),
                    "annealer_thread_ff.cpp",
                    "annealer_thread.cpp",
                )),
        )
        .benchmark(
            BenchmarkSpec::new("dedup", Category::Kernel)
                .variant(Serial, "", ["encoder.c"])
                .variant(
                    Pthreads,
                    "-DENABLE_PTHREADS",
                    ["encoder.c", "queue.h", "binheap.h", "tree.h", "queue.c", "binheap.c", "tree.c"],
                )
                .variant(FastFlow, "-DENABLE_FF -DENABLE_FF_ONDEMAND", ["encoder_ff_ofarm.cpp"])
                .variant(OmpSs, "-DENABLE_OMPSS -DENABLE_OMPSS_LOCKS", ["encoder.c"])
                .rule(Rule::rename(Some(FastFlow), "encoder_ff_", "encoder.c")),
        )
        .benchmark(
            BenchmarkSpec::new("facesim", Category::Application)
                .variant(Serial, "-DNEW_SERIAL_IMPLEMENTATIOM", FACESIM_FILES)
                .variant(Pthreads, "-DENABLE_PTHREADS", FACESIM_PTHREADS_FILES)
                .variant(FastFlow, "-DENABLE_FF", FACESIM_FILES)
                .variant(OmpSs, "-DENABLE_OMPSS -DUSE_TASKS", FACESIM_OMPSS_FILES)
                // The OmpSs collision forces implementation has no serial .cpp.
                .rule(
                    Rule::substitute(Some(OmpSs), "OMPSS_", "")
                        .except("OMPSS_COLLISION_PENALTY_FORCES.cpp"),
                ),
        )
        .benchmark(
            BenchmarkSpec::new("ferret", Category::Application)
                .variant(Serial, "", ["benchmark/ferret-serial.c"])
                .variant(
                    Pthreads,
                    "",
                    ["benchmark/ferret-pthreads.c", "include/tpool.h", "src/tpool.c"],
                )
                .variant(FastFlow, "", ["benchmark/ferret-ff-farm.cpp"])
                .variant(Tbb, "", ["benchmark/ferret-tbb.cpp", "benchmark/ferret-tbb.h"])
                .variant(OmpSs, "", ["benchmark/ferret-ompss.c"])
                .rule(Rule::rename(None, "ferret-", "benchmark/ferret-serial.c")),
        )
        .benchmark(
            BenchmarkSpec::new("fluidanimate", Category::Application)
                .variant(Serial, "", ["serial.cpp"])
                .variant(
                    Pthreads,
                    "",
                    ["pthreads.cpp", "parsec_barrier.hpp", "parsec_barrier.cpp"],
                )
                .variant(FastFlow, "", ["ff.cpp"])
                .variant(Tbb, "", ["tbb.cpp"])
                .variant(OmpSs, "", ["ompss-multideps-nobar.cpp"])
                .rule(Rule::variant_tag("serial.cpp")),
        )
        .benchmark(
            BenchmarkSpec::new("freqmine", Category::Application)
                .variant(Serial, "", ["fp_tree.cpp"])
                .variant(FastFlow, "", ["fp_tree_ff.cpp"])
                .variant(OpenMp, "", ["fp_tree.cpp"])
                .variant(OmpSs, "-D_OMPSS", ["fp_tree.cpp"])
                .rule(Rule::rename(Some(FastFlow), "fp_tree_ff.cpp", "fp_tree.cpp"))
                // freqmine ships no pthreads version; OpenMP is its native one.
                .substitute_reference(Pthreads, OpenMp),
        )
        .benchmark(
            BenchmarkSpec::new("raytrace", Category::Application)
                .variant(Serial, "", ["LRT/render.cxx"])
                .variant(
                    Pthreads,
                    "",
                    ["LRT/render.cxx", "RTTL/common/RTThread.cxx", "RTTL/common/RTThread.hxx"],
                )
                .variant(FastFlow, "-DFF_VERSION", ["LRT/render.cxx"])
                .variant(SkePU, "", ["LRT/render_skepu.cxx"])
                .rule(Rule::substitute(Some(SkePU), "_skepu", "")),
        )
        .benchmark(
            BenchmarkSpec::new("streamcluster", Category::Kernel)
                .variant(Serial, "", ["streamcluster.cpp"])
                .variant(
                    Pthreads,
                    "-DENABLE_THREADS",
                    ["streamcluster.cpp", "parsec_barrier.hpp", "parsec_barrier.cpp"],
                )
                .variant(FastFlow, "-DFF_VERSION", ["streamcluster.cpp"])
                .variant(Tbb, "-DTBB_VERSION", ["streamcluster.cpp"])
                .variant(OmpSs, "-DENABLE_OMPSS", ["ompss_streamcluster.cpp"])
                .variant(SkePU, "", ["streamcluster_skepu.cpp"])
                .rule(Rule::rename(
                    Some(OmpSs),
                    "ompss_streamcluster.cpp",
                    "streamcluster.cpp",
                ))
                .rule(Rule::substitute(Some(SkePU), "_skepu", "")),
        )
        .benchmark(
            BenchmarkSpec::new("swaptions", Category::Application)
                .variant(Serial, "", ["HJM_Securities.cpp"])
                .variant(Pthreads, "-DENABLE_THREADS", ["HJM_Securities.cpp"])
                .variant(FastFlow, "-DENABLE_THREADS -DFF_VERSION", ["HJM_Securities.cpp"])
                .variant(Tbb, "-DENABLE_THREADS -DTBB_VERSION", ["HJM_Securities.cpp"])
                .variant(OmpSs, "-DENABLE_OMPSS", ["HJM_Securities.cpp"])
                .variant(SkePU, "", ["HJM_Securities_skepu.cpp"])
                .rule(Rule::substitute(Some(SkePU), "_skepu", "")),
        )
        .benchmark(
            BenchmarkSpec::new("vips", Category::Application)
                .variant(Serial, "", ["libvips/iofuncs/threadpool.cc"])
                .variant(Pthreads, "-DHAVE_THREADS", ["libvips/iofuncs/threadpool.cc"])
                .variant(
                    FastFlow,
                    "-DHAVE_FF -DHAVE_THREADS",
                    ["libvips/iofuncs/threadpool.cc"],
                ),
        )
        .build()
}
