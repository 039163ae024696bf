use criterion::{criterion_group, criterion_main, Criterion, black_box};
use valuenet::board::Position;
use valuenet::eval::ValueNet;
use valuenet::search::{LeafEval, Minimax};

fn bench_search(c: &mut Criterion) {
    let p = Position::startpos();
    let net = ValueNet::selfplay(1);
    c.bench_function("minimax_depth_2_zero_leaf_startpos", |ben| {
        ben.iter(|| {
            let mut s = Minimax::new(&net, LeafEval::Zero);
            black_box(s.search(black_box(&p), true, 2))
        })
    });
    c.bench_function("minimax_depth_1_network_leaf_startpos", |ben| {
        ben.iter(|| {
            let mut s = Minimax::new(&net, LeafEval::Network);
            black_box(s.best_move(black_box(&p), true, 1))
        })
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
