//! Two instances whose record ports differ in layout, joined by an explicit
//! type mapper.

use cerata_ir::{GraphId, MappingMatrix, Pool, PortDir};
use cerata_vhdl::{generate_all, Design};

struct Setup {
    pool: Pool,
    top: GraphId,
}

fn setup() -> Setup {
    let mut pool = Pool::new();
    let v4 = pool.vector_of(4);
    let v2 = pool.vector_of(2);
    let rec_a = pool.record("rec_a", &[("q", v4), ("r", v2), ("s", v2), ("t", v4)]);
    let rec_b = pool.record("rec_b", &[("u", v4), ("v", v2), ("w", v2), ("x", v4)]);

    let mut matrix = MappingMatrix::new(5, 5);
    matrix.add(0, 0).unwrap();
    matrix.add(1, 2).unwrap().add(1, 3).unwrap();
    matrix.add(3, 1).unwrap();
    matrix.add(2, 1).unwrap();
    matrix.add(4, 4).unwrap();
    let mapper = pool.mapper_from_matrix(rec_a, rec_b, matrix).unwrap();
    pool.add_mapper(mapper);

    let x = pool.component("x");
    let o = pool.port("o", rec_a, PortDir::Out);
    pool.add_node(x, o).unwrap();
    let y = pool.component("y");
    let i = pool.port("i", rec_b, PortDir::In);
    pool.add_node(y, i).unwrap();

    let top = pool.component("top");
    let xi = pool.instantiate(top, x, None).unwrap();
    let yi = pool.instantiate(top, y, None).unwrap();
    let xo = pool.port_of(xi, "o").unwrap();
    let yin = pool.port_of(yi, "i").unwrap();
    pool.connect(yin, xo).unwrap();
    Setup { pool, top }
}

#[test]
fn both_sides_carry_twelve_bits() {
    let mut s = setup();
    for name in ["rec_a", "rec_b"] {
        let ty = s.pool.find_type(name).unwrap();
        let width = s.pool.flat_width(ty).unwrap();
        assert_eq!(s.pool.int_value(width), Some(12), "{name}");
    }
}

#[test]
fn port_maps_slice_through_the_mapper() {
    let s = setup();
    let text = Design::new(&s.pool, s.top).generate().unwrap().to_string();

    let y_map = "  y_inst : y\n\
                 \x20   port map (\n\
                 \x20     i_u(1 downto 0) => x_inst_o_s,\n\
                 \x20     i_u(3 downto 2) => x_inst_o_r,\n\
                 \x20     i_v             => x_inst_o_q(1 downto 0),\n\
                 \x20     i_w             => x_inst_o_q(3 downto 2),\n\
                 \x20     i_x             => x_inst_o_t\n\
                 \x20   );\n";
    assert!(text.contains(y_map), "{text}");

    let x_map = "  x_inst : x\n\
                 \x20   port map (\n\
                 \x20     o_q => x_inst_o_q,\n\
                 \x20     o_r => x_inst_o_r,\n\
                 \x20     o_s => x_inst_o_s,\n\
                 \x20     o_t => x_inst_o_t\n\
                 \x20   );\n";
    assert!(text.contains(x_map), "{text}");
}

#[test]
fn intermediate_signal_is_declared() {
    let s = setup();
    let text = Design::new(&s.pool, s.top).generate().unwrap().to_string();
    assert!(text.contains("  signal x_inst_o_q : std_logic_vector(4-1 downto 0);\n"));
    assert!(text.contains("  signal x_inst_o_r : std_logic_vector(2-1 downto 0);\n"));
    assert!(text.contains("  component x is\n"));
    assert!(text.contains("  component y is\n"));
    // no direct instance-to-instance assignment survives
    assert!(!text.contains("<="));
}

#[test]
fn whole_hierarchy() {
    let s = setup();
    let files = generate_all(&s.pool, s.top, Some("typeconv")).unwrap();
    let names: Vec<_> = files.iter().map(|f| f.component.as_str()).collect();
    assert_eq!(names.last(), Some(&"top"));
    assert_eq!(names.len(), 3);
    let y = files.iter().find(|f| f.component == "y").unwrap();
    assert!(y.source.starts_with("-- typeconv\n"));
    assert!(y.source.contains("    i_u : in  std_logic_vector(4-1 downto 0);\n"), "{}", y.source);
}
