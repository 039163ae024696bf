use criterion::{criterion_group, criterion_main, Criterion, black_box};
use valuenet::board::Position;
use valuenet::encoder::encode;
use valuenet::eval::ValueNet;

fn bench_eval(c: &mut Criterion) {
    let f = encode(&Position::startpos(), true);
    let small = ValueNet::selfplay(1);
    let large = ValueNet::pgn(1);
    c.bench_function("forward_selfplay_net_startpos", |ben| {
        ben.iter(|| black_box(small.forward(black_box(f.as_slice()))))
    });
    c.bench_function("forward_pgn_net_startpos", |ben| {
        ben.iter(|| black_box(large.forward(black_box(f.as_slice()))))
    });
    c.bench_function("backward_selfplay_net_startpos", |ben| {
        let mut grads = small.zero_grads();
        ben.iter(|| black_box(small.accumulate_gradients(black_box(f.as_slice()), 1.0, &mut grads)))
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
