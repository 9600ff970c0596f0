use attrplate::{Context, Record, Template, Value};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const ROSTER: &str = r#"
<html>
  <body>
    <h1 t:text="${school.name}">School</h1>
    <table>
      <tr t:each="student: ${students}">
        <td t:text="${student.id}"></td>
        <td t:text="${student.name}"></td>
        <td t:if="${student.active}">active</td>
      </tr>
    </table>
  </body>
</html>
"#;

fn context(size: usize) -> Context {
    let students: Vec<Value> = (0..size)
        .map(|i| {
            Value::from(
                Record::new("Student")
                    .field("id", i)
                    .field("name", format!("Student {}", i))
                    .field("active", i % 2 == 0),
            )
        })
        .collect();

    let mut context = Context::new();
    context.put("school", Record::new("School").field("name", "Central"));
    context.put("students", students);
    context
}

fn benchmark_parse(c: &mut Criterion) {
    c.bench_function("template_parse", |b| {
        b.iter(|| {
            let template = Template::parse(black_box(ROSTER)).unwrap();
            black_box(template);
        })
    });
}

fn benchmark_render(c: &mut Criterion) {
    let template = Template::parse(ROSTER).unwrap();

    for size in [10, 1000] {
        let mut context = context(size);
        c.bench_function(&format!("render_roster_{}", size), |b| {
            b.iter(|| {
                let output = template.render_to_string(&mut context).unwrap();
                black_box(output);
            })
        });
    }
}

fn benchmark_validate(c: &mut Criterion) {
    let template = Template::parse(ROSTER).unwrap();

    c.bench_function("template_validate", |b| {
        b.iter(|| {
            template.validate().unwrap();
        })
    });
}

criterion_group!(benches, benchmark_parse, benchmark_render, benchmark_validate);
criterion_main!(benches);
