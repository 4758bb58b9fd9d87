use web_sys::{WebGl2RenderingContext as GL, WebGlProgram, WebGlShader};

pub fn compile_shader(gl: &GL, kind: u32, source: &str, label: &str) -> anyhow::Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| anyhow::anyhow!("{}: create_shader failed", label))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !ok {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        anyhow::bail!("{} compile error: {}", label, info);
    }
    Ok(shader)
}

pub fn link_program(gl: &GL, vert_src: &str, frag_src: &str) -> anyhow::Result<WebGlProgram> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vert_src, "vertex")?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, frag_src, "fragment")?;
    let program = gl
        .create_program()
        .ok_or_else(|| anyhow::anyhow!("create_program failed"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    // Shaders are owned by the program once linked
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));
    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !ok {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        anyhow::bail!("link error: {}", info);
    }
    Ok(program)
}
