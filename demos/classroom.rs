extern crate seatplan;

use seatplan::{
    randomize, reshuffle, Chart, ChartId, ConstraintSet, Gender, Layout, Person, PersonId,
    Timestamp,
};

fn main() {
    env_logger::init();

    let now = Timestamp(0);
    let layout = Layout::parse_custom("2 3 3 2\n2 3 3 2\n2 3 3").unwrap();
    let mut chart = Chart::new(ChartId::new("demo"), "classroom", layout, now);

    let roster = [
        ("laurie", Gender::A),
        ("lucy", Gender::A),
        ("rita", Gender::A),
        ("maya", Gender::A),
        ("ines", Gender::A),
        ("eric", Gender::B),
        ("tom", Gender::B),
        ("ben", Gender::B),
        ("omar", Gender::B),
        ("ivo", Gender::B),
        ("sam", Gender::Unspecified),
        ("kit", Gender::Unspecified),
    ];
    for (name, gender) in roster {
        chart = chart.add_person(Person::new(name, name, gender), now);
    }

    // the teacher's desk rule: eric stays up front
    chart = chart
        .set_locked(&PersonId::new("eric"), true, now)
        .place(&PersonId::new("eric"), 0, 0, now);

    let constraints = ConstraintSet {
        together: vec![
            vec![PersonId::new("laurie"), PersonId::new("lucy")],
            vec![PersonId::new("lucy"), PersonId::new("rita")],
        ],
        apart: vec![[PersonId::new("tom"), PersonId::new("ben")]],
        mix_genders: false,
    };

    let mut rng = rand::thread_rng();
    let seated = randomize(&chart, Some(&constraints), &mut rng, Timestamp(1));
    println!("randomized:");
    print_grid(&seated);

    let shuffled = reshuffle(&seated, Some(&constraints), &mut rng, Timestamp(2));
    println!("\nreshuffled (avoiding previous neighbors):");
    print_grid(&shuffled);
}

fn print_grid(chart: &Chart) {
    for row in 0..chart.rows() {
        let mut cells = vec![];
        for col in 0..chart.cols() {
            if !chart.layout().is_seat(row, col) {
                continue;
            }
            let name = match chart.occupant(row, col) {
                Some(id) => chart.person(id).map(|p| p.name.as_str()).unwrap_or("?"),
                None => "-",
            };
            cells.push(format!("{:>8}", name));
        }
        println!("{}", cells.join(" "));
    }
    let standing: Vec<&str> = chart.unplaced().iter().map(|p| p.name.as_str()).collect();
    if !standing.is_empty() {
        println!("unplaced: {}", standing.join(", "));
    }
}
