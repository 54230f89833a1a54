// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use nereid_flow::{FlowConfig, FlowDesigner, InMemorySurface};

mod fixtures;
mod profiler;

// Benchmark identity (keep stable):
// - Group names in this file: `arrange.cycle`, `arrange.load`
// - Case IDs come from `fixtures::Case::id` and must not be renamed.
fn benches_arrange(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");

    {
        let mut group = c.benchmark_group("arrange.cycle");

        for case in fixtures::Case::ALL {
            let data = fixtures::fixture(case);
            let config = FlowConfig::default();
            let surface = InMemorySurface::new(config.canvas.size(), config.nodes.size());
            let mut designer = FlowDesigner::new(surface, config);
            runtime.block_on(designer.load_graph(&data));

            group.throughput(Throughput::Elements(data.connections.len() as u64));
            group.bench_function(case.id(), |b| {
                b.iter(|| {
                    let report = runtime.block_on(designer.auto_arrange());
                    black_box(report.restored)
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("arrange.load");

        for case in fixtures::Case::ALL {
            let data = fixtures::fixture(case);
            let config = FlowConfig::default();
            let surface = InMemorySurface::new(config.canvas.size(), config.nodes.size());
            let mut designer = FlowDesigner::new(surface, config);

            group.throughput(Throughput::Elements(data.nodes.len() as u64));
            group.bench_function(case.id(), |b| {
                b.iter(|| {
                    let report = runtime.block_on(designer.load_graph(black_box(&data)));
                    black_box(report.connections)
                })
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_arrange
}
criterion_main!(benches);
