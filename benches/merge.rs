use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use chemsplice::registry::find_r_group;
use chemsplice::smiles::parse_smiles;
use chemsplice::{close_ring, merge, merge_into, resolve_all, Attachment, Molecule, SmilesToolkit};

const RIBOSE: &str =
    "[H][C@@]1([*])O[C@H](CO[*])[C@@H](O[*])[C@H]1O |$;;_R1;;;;;_R3;;;_R2;;$|";
const ADENINE: &str = "[*]n1cnc2c1ncnc2N |$_R1;;;;;;;;;;;;$|";
const RESIDUE: &str = "C[C@H](N[*])C([*])=O |$;;;_R1;;_R2;$|";

fn bench_pair(c: &mut Criterion) {
    let ribose = parse_smiles(RIBOSE).unwrap();
    let adenine = parse_smiles(ADENINE).unwrap();

    c.bench_function("merge_ribose_adenine", |b| {
        b.iter_batched(
            || (ribose.clone(), adenine.clone()),
            |(first, second)| {
                let ra = find_r_group(&first, 1).unwrap();
                let rb = find_r_group(&second, 1).unwrap();
                black_box(merge(first, ra, second, rb).unwrap())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_chain(c: &mut Criterion) {
    let residue = parse_smiles(RESIDUE).unwrap();

    c.bench_function("chain_of_10_residues", |b| {
        b.iter_batched(
            || (0..10).map(|_| residue.clone()).collect::<Vec<Molecule>>(),
            |residues| {
                let mut residues = residues.into_iter();
                let mut chain = residues.next().unwrap();
                for next in residues {
                    let r2 = find_r_group(&chain, 2).unwrap();
                    let r1 = find_r_group(&next, 1).unwrap();
                    merge_into(&mut chain, r2, next, r1).unwrap();
                }
                black_box(chain)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_ring_closure(c: &mut Criterion) {
    let chain = {
        let mut chain = parse_smiles(RESIDUE).unwrap();
        for _ in 0..5 {
            let next = parse_smiles(RESIDUE).unwrap();
            let r2 = find_r_group(&chain, 2).unwrap();
            let r1 = find_r_group(&next, 1).unwrap();
            merge_into(&mut chain, r2, next, r1).unwrap();
        }
        chain
    };

    c.bench_function("close_cyclic_hexapeptide", |b| {
        b.iter_batched(
            || chain.clone(),
            |mut mol| {
                let r1 = find_r_group(&mol, 1).unwrap();
                let r2 = find_r_group(&mol, 2).unwrap();
                close_ring(&mut mol, r2, r1).unwrap();
                black_box(mol)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_resolve(c: &mut Criterion) {
    let ribose = parse_smiles(RIBOSE).unwrap().with_attachments(
        [
            Attachment::new("R1-OH", "R1", "OH", "O[*] |$;_R1$|"),
            Attachment::new("R2-H", "R2", "H", "[*][H] |$_R2;$|"),
            Attachment::new("R3-H", "R3", "H", "[*][H] |$_R3;$|"),
        ]
        .into_iter()
        .collect(),
    );

    c.bench_function("resolve_all_ribose", |b| {
        b.iter_batched(
            || ribose.clone(),
            |mut mol| black_box(resolve_all(&SmilesToolkit, &mut mol).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_pair, bench_chain, bench_ring_closure, bench_resolve);
criterion_main!(benches);
