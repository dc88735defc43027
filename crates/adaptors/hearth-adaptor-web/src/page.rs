//! Embedded chat page served at `/`

pub(crate) const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Hearth - Property &amp; Tenancy Assistant</title>
  <style>
    :root {
      --bg: #f8fafc;
      --card: #ffffff;
      --primary: #2563eb;
      --inspector: #ea580c;
      --tenancy: #7c3aed;
      --text: #1e293b;
      --muted: #64748b;
      --border: rgba(0,0,0,0.08);
    }
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: var(--bg);
      color: var(--text);
      min-height: 100vh;
    }
    .app { display: grid; grid-template-columns: 1fr 300px; height: 100vh; }
    .chat { display: flex; flex-direction: column; overflow: hidden; }
    header { padding: 16px 20px; border-bottom: 1px solid var(--border); background: var(--card); }
    header h1 { font-size: 18px; }
    header p { font-size: 12px; color: var(--muted); }
    #transcript { flex: 1; overflow-y: auto; padding: 20px; display: flex; flex-direction: column; gap: 12px; }
    .turn { max-width: 75%; padding: 10px 14px; border-radius: 12px; white-space: pre-wrap; line-height: 1.45; font-size: 14px; }
    .turn.user { align-self: flex-end; background: var(--primary); color: white; }
    .turn.agent { align-self: flex-start; background: var(--card); border: 1px solid var(--border); }
    .turn .meta { font-size: 11px; color: var(--muted); margin-bottom: 4px; }
    .turn.user .meta { color: rgba(255,255,255,0.8); }
    .turn img { max-width: 240px; border-radius: 8px; display: block; margin-bottom: 6px; }
    .welcome { color: var(--muted); font-size: 14px; text-align: center; margin-top: 40px; }
    #progress { padding: 0 20px 8px; font-size: 12px; color: var(--muted); min-height: 20px; }
    form { display: flex; gap: 8px; padding: 12px 20px; border-top: 1px solid var(--border); background: var(--card); align-items: center; }
    #text { flex: 1; padding: 10px 12px; border: 1px solid var(--border); border-radius: 8px; font-size: 14px; }
    button { padding: 10px 16px; border: 0; border-radius: 8px; background: var(--primary); color: white; font-weight: 600; cursor: pointer; }
    button:disabled { opacity: 0.5; cursor: not-allowed; }
    .file-label { font-size: 12px; color: var(--muted); cursor: pointer; }
    #image { display: none; }
    #preview { font-size: 12px; color: var(--muted); }
    aside { border-left: 1px solid var(--border); background: var(--card); padding: 20px; overflow-y: auto; }
    aside h2 { font-size: 13px; text-transform: uppercase; letter-spacing: 0.5px; color: var(--muted); margin: 16px 0 8px; }
    aside h2:first-child { margin-top: 0; }
    .agent { padding: 10px 12px; border: 1px solid var(--border); border-radius: 10px; margin-bottom: 8px; }
    .agent.active { border-color: var(--primary); box-shadow: 0 2px 8px rgba(37,99,235,0.15); }
    .agent .name { font-weight: 600; font-size: 14px; }
    .agent .desc { font-size: 12px; color: var(--muted); }
    .agent .confidence { font-size: 11px; color: var(--primary); margin-top: 4px; }
    #location { width: 100%; padding: 8px 10px; border: 1px solid var(--border); border-radius: 8px; font-size: 13px; }
  </style>
</head>
<body>
  <div class="app">
    <section class="chat">
      <header>
        <h1>Hearth</h1>
        <p>Property inspection and tenancy guidance, routed to the right specialist</p>
      </header>
      <div id="transcript"></div>
      <div id="progress"></div>
      <form id="composer">
        <label class="file-label" for="image">Attach photo</label>
        <input id="image" type="file" accept="image/*">
        <span id="preview"></span>
        <input id="text" type="text" placeholder="Describe a property issue or ask about your tenancy..." autocomplete="off">
        <button id="send" type="submit">Send</button>
      </form>
    </section>
    <aside>
      <h2>Agents</h2>
      <div id="agents"></div>
      <h2>Your location</h2>
      <input id="location" type="text" placeholder="City, state or country">
    </aside>
  </div>
  <script>
    const transcript = document.getElementById('transcript');
    const progress = document.getElementById('progress');
    const textInput = document.getElementById('text');
    const imageInput = document.getElementById('image');
    const preview = document.getElementById('preview');
    const sendBtn = document.getElementById('send');
    const locationInput = document.getElementById('location');
    let agents = [];
    let lastAgentTurn = null;
    let pending = false;

    function agentName(id) {
      const a = agents.find(a => a.id === id);
      return a ? a.name : id;
    }

    function renderAgents(activeId) {
      const box = document.getElementById('agents');
      box.innerHTML = '';
      agents.forEach(a => {
        const div = document.createElement('div');
        div.className = 'agent' + (a.id === activeId ? ' active' : '');
        const name = document.createElement('div');
        name.className = 'name';
        name.textContent = a.name;
        const desc = document.createElement('div');
        desc.className = 'desc';
        desc.textContent = a.description;
        div.appendChild(name);
        div.appendChild(desc);
        if (lastAgentTurn && lastAgentTurn.agentId === a.id && typeof lastAgentTurn.confidence === 'number') {
          const conf = document.createElement('div');
          conf.className = 'confidence';
          conf.textContent = 'Confidence: ' + Math.round(lastAgentTurn.confidence) + '%';
          div.appendChild(conf);
        }
        box.appendChild(div);
      });
    }

    function appendTurn(turn) {
      const welcome = transcript.querySelector('.welcome');
      if (welcome) welcome.remove();
      const div = document.createElement('div');
      div.className = 'turn ' + turn.role;
      const meta = document.createElement('div');
      meta.className = 'meta';
      const when = new Date(turn.timestamp).toLocaleTimeString();
      meta.textContent = (turn.role === 'agent' ? agentName(turn.agentId) : 'You') + ' - ' + when;
      div.appendChild(meta);
      if (turn.image) {
        const img = document.createElement('img');
        img.src = 'data:' + turn.image.mediaType + ';base64,' + turn.image.data;
        div.appendChild(img);
      }
      const body = document.createElement('div');
      body.textContent = turn.text;
      div.appendChild(body);
      transcript.appendChild(div);
      transcript.scrollTop = transcript.scrollHeight;
      if (turn.role === 'agent') lastAgentTurn = turn;
    }

    function setPending(on, label) {
      pending = on;
      sendBtn.disabled = on;
      progress.textContent = on ? (label || 'Processing your request...') : '';
    }

    async function refreshSession(rebuild) {
      const res = await fetch('/api/session');
      if (!res.ok) return;
      const s = await res.json();
      if (rebuild) {
        transcript.innerHTML = '';
        if (s.turns.length === 0) {
          const w = document.createElement('div');
          w.className = 'welcome';
          w.textContent = 'Upload a photo of a property issue or ask a question about your lease to get started.';
          transcript.appendChild(w);
        }
        s.turns.forEach(appendTurn);
        if (document.activeElement !== locationInput) locationInput.value = s.location || '';
      }
      if (s.state === 'awaiting_response') setPending(true, s.progressLabel);
      renderAgents(s.activeAgent);
    }

    function readImage(file) {
      return new Promise((resolve, reject) => {
        const reader = new FileReader();
        reader.onload = () => resolve(reader.result);
        reader.onerror = () => reject(reader.error);
        reader.readAsDataURL(file);
      });
    }

    imageInput.addEventListener('change', () => {
      const f = imageInput.files[0];
      preview.textContent = f ? f.name : '';
    });

    locationInput.addEventListener('change', async () => {
      await fetch('/api/location', {
        method: 'PUT',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ location: locationInput.value })
      });
    });

    document.getElementById('composer').addEventListener('submit', async (ev) => {
      ev.preventDefault();
      if (pending) return;
      const text = textInput.value;
      const file = imageInput.files[0];
      if (!text.trim() && !file) return;
      const payload = { text };
      if (file) payload.image = await readImage(file);

      textInput.value = '';
      imageInput.value = '';
      preview.textContent = '';
      setPending(true);
      const req = fetch('/api/chat', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(payload)
      });
      setTimeout(() => refreshSession(true), 150);
      try {
        const res = await req;
        if (!res.ok) {
          const err = await res.json().catch(() => ({ error: res.statusText }));
          progress.textContent = 'Error: ' + err.error;
          pending = false;
          sendBtn.disabled = false;
          return;
        }
        setPending(false);
        await refreshSession(true);
      } catch (e) {
        progress.textContent = 'Error: ' + e;
        pending = false;
        sendBtn.disabled = false;
      }
    });

    (async () => {
      const res = await fetch('/api/agents');
      agents = res.ok ? await res.json() : [];
      await refreshSession(true);
    })();
  </script>
</body>
</html>
"##;
