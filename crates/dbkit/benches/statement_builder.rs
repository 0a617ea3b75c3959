use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dbkit::{Columns, Dialect, RowSet, Value, bind_named, qb};

fn wide_columns(n: usize) -> Columns {
    (0..n)
        .map(|i| (format!("col{i}"), Value::Int(i as i64)))
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/insert");

    for n in [1, 5, 10, 50] {
        let data = wide_columns(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| black_box(qb::insert(Dialect::MySql, "t", data)));
        });
    }

    group.finish();
}

fn bench_insert_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/insert_many");

    for rows in [10, 100, 1000] {
        let header: Vec<String> = (0..4).map(|c| format!("c{c}")).collect();
        let set = RowSet::from_rows(
            header,
            (0..rows).map(|r| (0..4).map(move |c| (r * 4 + c) as i64)),
        )
        .unwrap();
        for dialect in [Dialect::MySql, Dialect::Postgres] {
            group.bench_with_input(
                BenchmarkId::new(format!("{dialect:?}"), rows),
                &set,
                |b, set| {
                    b.iter(|| black_box(qb::insert_many(dialect, "t", set)));
                },
            );
        }
    }

    group.finish();
}

fn bench_bind_named(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_builder/bind_named");

    for n in [1, 10, 50] {
        let params = wide_columns(n);
        let predicate = (0..n)
            .map(|i| format!("col{i} = :col{i}"))
            .collect::<Vec<_>>()
            .join(" AND ");
        let sql = format!("SELECT * FROM t WHERE {predicate} AND note <> ':not_a_param'");
        group.bench_with_input(BenchmarkId::from_parameter(n), &sql, |b, sql| {
            b.iter(|| black_box(bind_named(Dialect::Postgres, sql, &params)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_insert_many, bench_bind_named);
criterion_main!(benches);
